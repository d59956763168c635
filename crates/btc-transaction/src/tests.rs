//! Tests for the btc-transaction crate.
//!
//! Covers legacy and segwit parsing against mainnet transactions, the
//! serialization round trip, txid/wtxid, the legacy and BIP143 signature
//! hashes including the sighash flag variants, and end-to-end signing of
//! P2PKH, P2WPKH and P2SH-P2WPKH inputs.

use btc_primitives::chainhash::Hash;
use btc_primitives::ec::{PrivateKey, Signature};
use btc_primitives::ErrorKind;
use btc_script::Script;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::sighash::{self, SegwitSighashCache};
use crate::sighash::{SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_NONE, SIGHASH_SINGLE};
use crate::signer::{sign_input, sign_input_for_script, Signer, SignerConfig, SigningState};
use crate::transaction::{LockTime, Transaction};
use crate::witness::Witness;

// -----------------------------------------------------------------------
// Test vectors
// -----------------------------------------------------------------------

/// Legacy P2PKH spend, one input and two outputs.
const LEGACY_TX_HEX: &str = "0100000001813f79011acb80925dfe69b3def355fe914bd1d96a3f5f71bf8303c6a989c7d1000000006b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278afeffffff02a135ef01000000001976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac99c39800000000001976a9141c4bc762dd5423e332166702cb75f40df79fea1288ac19430600";

/// P2WPKH spend, one input and one output.
const SEGWIT_TX_HEX: &str = "01000000000101076b57644e155af90f5d9f416b44a3794e0b982c2c427f0845c0e0c62fbb346f0000000000fdffffff0198eb100000000000160014934478b061fa4b5b4dba4f314fb380f3ef77e21902483045022100b7fcf54ae5d7c645b5b44ef7f846e95de9a97a099a447bf8daf14a46f5e3d464022025e709d6794a6fd5b69a7d271fc9a93fcc170b38cfbe5640b6c5d6ec88f021240121025330a1df68c516d32a87ea8ea3da573fa9d86b1b173875beecbf0bdbe45cba8cea7c0a00";

/// Unsigned two-input transaction from the BIP143 native P2WPKH example.
const BIP143_UNSIGNED_TX_HEX: &str = "0100000002fff7f7881a8099afa6940d42d1e7f6362bec38171ea3edf433541db4e4ad969f0000000000eeffffffef51e1b804cc89d182d279655c3aa89e815b1b309fe287d9b2b55d57b90ec68a0100000000ffffffff02202cb206000000001976a9148280b37df378db99f66f85c95a783a76ac7a6d5988ac9093510d000000001976a9143bde42dbee7e4dbe6a21b2d50ce2f0167faa815988ac11000000";

const LEGACY_FUNDING_SCRIPT_HEX: &str = "76a914a802fc56c704ce87c42d7c92eb75e7896bdc41ae88ac";
const BIP143_PUBKEY_HASH: &str = "1d0f172a0ecb48aee1be1f2687d2963ae33f71a1";
const BIP143_AMOUNT: u64 = 600_000_000;

/// 16-byte testnet secret controlling tb1q63rv8027mnhszkmf0f5qkxhk48r9tcyk0n6m8l.
const EXAMPLE_SECRET: &str = "4b357284216a4262a36cc166018b9302";
const EXAMPLE_PREV_TXID: &str = "67e41a52c17499cee80aa9e62f9c6e68c5c5432bd7ecedbf62c308fd28d79113";
const EXAMPLE_TAPROOT_SCRIPT: &str = "512086cd6839f231f3ca3614206f080892ea1d4e2158ca851a49fbb1c8bb72778a55";

const EXAMPLE_UNSIGNED_HEX: &str = "010000000001011391d728fd08c362bfedecd72b43c5c5686e9c2fe6a90ae8ce9974c1521ae4670100000000ffffffff01282300000000000022512086cd6839f231f3ca3614206f080892ea1d4e2158ca851a49fbb1c8bb72778a550000000000";
const EXAMPLE_SIGNED_P2WPKH_HEX: &str = "010000000001011391d728fd08c362bfedecd72b43c5c5686e9c2fe6a90ae8ce9974c1521ae4670100000000ffffffff01282300000000000022512086cd6839f231f3ca3614206f080892ea1d4e2158ca851a49fbb1c8bb72778a5502473044022046dd4f0bf6b64eaac0f1713a1cd9287b943b779d0e612c439943016c3f019afe02206d41063ff82b98f2e19c2d9d299f4c39aa51226eaed1d94e9dd9eb45fe37fdca012102d62c8e71ff82a7ed6782edc3d2667f3ed83d847c30e999a28f01e9ad7ea220a500000000";
const EXAMPLE_SIGNED_P2PKH_HEX: &str = "01000000011391d728fd08c362bfedecd72b43c5c5686e9c2fe6a90ae8ce9974c1521ae467010000006b483045022100d21bb98742bf61f1af162522ebef9b7b534c0a7c133e75acfbbd4eefdfc511550220271a2853da921f02859838e0edae9d582782760f4a9476313232440ef963d657012102d62c8e71ff82a7ed6782edc3d2667f3ed83d847c30e999a28f01e9ad7ea220a5ffffffff01282300000000000022512086cd6839f231f3ca3614206f080892ea1d4e2158ca851a49fbb1c8bb72778a5500000000";
const EXAMPLE_SIGNED_NESTED_HEX: &str = "010000000001011391d728fd08c362bfedecd72b43c5c5686e9c2fe6a90ae8ce9974c1521ae4670100000017160014d446c3bd5edcef015b697a680b1af6a9c655e096ffffffff01282300000000000022512086cd6839f231f3ca3614206f080892ea1d4e2158ca851a49fbb1c8bb72778a5502473044022046dd4f0bf6b64eaac0f1713a1cd9287b943b779d0e612c439943016c3f019afe02206d41063ff82b98f2e19c2d9d299f4c39aa51226eaed1d94e9dd9eb45fe37fdca012102d62c8e71ff82a7ed6782edc3d2667f3ed83d847c30e999a28f01e9ad7ea220a500000000";

fn example_key() -> PrivateKey {
    PrivateKey::from_secret_bytes(&hex::decode(EXAMPLE_SECRET).unwrap()).unwrap()
}

/// The one-input, one-output example transaction before signing.
fn example_tx(is_segwit: bool) -> Transaction {
    let mut tx = if is_segwit {
        Transaction::new_segwit()
    } else {
        Transaction::new()
    };
    tx.add_input(TransactionInput::new(Hash::from_hex(EXAMPLE_PREV_TXID).unwrap(), 1));
    tx.add_output(TransactionOutput::new(
        9_000,
        Script::from_hex(EXAMPLE_TAPROOT_SCRIPT).unwrap(),
    ));
    tx
}

fn bip143_script_code() -> Script {
    let mut pkh = [0u8; 20];
    pkh.copy_from_slice(&hex::decode(BIP143_PUBKEY_HASH).unwrap());
    Script::p2pkh(&pkh)
}

// -----------------------------------------------------------------------
// Parsing
// -----------------------------------------------------------------------

#[test]
fn test_parse_legacy_transaction() {
    let tx = Transaction::from_hex(LEGACY_TX_HEX).expect("should parse legacy tx");
    assert_eq!(tx.version, 1);
    assert!(!tx.is_segwit);

    assert_eq!(tx.inputs.len(), 1);
    let input = &tx.inputs[0];
    assert_eq!(
        input.previous_txid.to_string(),
        "d1c789a9c60383bf715f3f6ad9d14b91fe55f3deb369fe5d9280cb1a01793f81"
    );
    assert_eq!(input.previous_index, 0);
    assert_eq!(
        hex::encode(input.script_sig().serialize()),
        "6b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278a"
    );
    assert_eq!(input.sequence, 0xffff_fffe);
    assert!(input.witness().is_empty());

    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.outputs[0].amount, 32_454_049);
    assert_eq!(
        hex::encode(tx.outputs[0].script_pubkey.serialize()),
        "1976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac"
    );
    assert_eq!(tx.outputs[1].amount, 10_011_545);
    assert_eq!(
        hex::encode(tx.outputs[1].script_pubkey.serialize()),
        "1976a9141c4bc762dd5423e332166702cb75f40df79fea1288ac"
    );

    assert_eq!(tx.lock_time, 410_393);
}

#[test]
fn test_parse_segwit_transaction() {
    let tx = Transaction::from_hex(SEGWIT_TX_HEX).expect("should parse segwit tx");
    assert_eq!(tx.version, 1);
    assert!(tx.is_segwit);

    assert_eq!(tx.inputs.len(), 1);
    let input = &tx.inputs[0];
    assert_eq!(
        input.previous_txid.to_string(),
        "6f34bb2fc6e0c045087f422c2c980b4e79a3446b419f5d0ff95a154e64576b07"
    );
    assert_eq!(input.previous_index, 0);
    assert_eq!(hex::encode(input.script_sig().serialize()), "00");
    assert_eq!(input.sequence, 0xffff_fffd);
    assert_eq!(input.witness().len(), 2);
    assert_eq!(
        input.witness().to_hex(),
        "02483045022100b7fcf54ae5d7c645b5b44ef7f846e95de9a97a099a447bf8daf14a46f5e3d464022025e709d6794a6fd5b69a7d271fc9a93fcc170b38cfbe5640b6c5d6ec88f021240121025330a1df68c516d32a87ea8ea3da573fa9d86b1b173875beecbf0bdbe45cba8c"
    );

    assert_eq!(tx.outputs.len(), 1);
    assert_eq!(tx.outputs[0].amount, 1_108_888);
    assert_eq!(
        hex::encode(tx.outputs[0].script_pubkey.serialize()),
        "160014934478b061fa4b5b4dba4f314fb380f3ef77e219"
    );

    assert_eq!(tx.lock_time, 687_338);
}

#[test]
fn test_serialize_roundtrip() {
    for raw in [LEGACY_TX_HEX, SEGWIT_TX_HEX, BIP143_UNSIGNED_TX_HEX, EXAMPLE_UNSIGNED_HEX] {
        let tx = Transaction::from_hex(raw).unwrap();
        assert_eq!(tx.to_hex(), raw);
        assert_eq!(tx.to_string(), raw);
    }
}

#[test]
fn test_unknown_segwit_flag_rejected() {
    // Flag byte changed from 01 to 02.
    let bad = SEGWIT_TX_HEX.replacen("01000000000101", "01000000000201", 1);
    let err = Transaction::from_hex(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("segwit flag"));
}

#[test]
fn test_truncated_and_trailing_rejected() {
    let truncated = &LEGACY_TX_HEX[..LEGACY_TX_HEX.len() - 2];
    let err = Transaction::from_hex(truncated).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let trailing = format!("{}00", LEGACY_TX_HEX);
    let err = Transaction::from_hex(&trailing).unwrap_err();
    assert!(err.to_string().contains("trailing"));

    assert!(Transaction::from_hex("zz").is_err());
    assert!(Transaction::from_bytes(&[]).is_err());
}

#[test]
fn test_absurd_input_count_rejected() {
    // Version, then an input count of 0xffffffff with nothing behind it.
    let err = Transaction::from_hex("01000000feffffffff").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_declared_segwit_flag_wins() {
    let tx = example_tx(true);
    assert!(tx.inputs[0].witness().is_empty());
    assert_eq!(tx.to_hex(), EXAMPLE_UNSIGNED_HEX);

    let legacy = example_tx(false);
    assert_eq!(legacy.to_bytes(), tx.to_legacy_bytes());
}

// -----------------------------------------------------------------------
// Identifiers, size and amounts
// -----------------------------------------------------------------------

#[test]
fn test_txid_and_wtxid() {
    let legacy = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    assert_eq!(
        legacy.txid().to_string(),
        "452c629d67e41baec3ac6f04fe744b4b9617f8f859c63b3002f8684e7a4fee03"
    );
    assert_eq!(legacy.wtxid(), legacy.txid());

    let segwit = Transaction::from_hex(SEGWIT_TX_HEX).unwrap();
    assert_eq!(
        segwit.txid().to_string(),
        "b33ebeaacb3029944ae74d30248723a797f7b8b1263d28907268ce983ad70080"
    );
    assert_eq!(
        segwit.wtxid().to_string(),
        "78ad0b9857102674f7cdab6a608ee62e46f2f635ddb597bb8039cf6821ba61c6"
    );
}

#[test]
fn test_size_weight_vsize() {
    let legacy = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    assert_eq!(legacy.size(), 226);
    assert_eq!(legacy.weight(), 904);
    assert_eq!(legacy.vsize(), 226);

    let segwit = Transaction::from_hex(SEGWIT_TX_HEX).unwrap();
    assert_eq!(segwit.size(), 192);
    assert_eq!(segwit.to_legacy_bytes().len(), 82);
    assert_eq!(segwit.weight(), 438);
    assert_eq!(segwit.vsize(), 110);
}

#[test]
fn test_total_output_amount() {
    let tx = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    assert_eq!(tx.total_output_amount().unwrap(), 42_465_594);

    let mut overflow = Transaction::new();
    overflow.add_output(TransactionOutput::new(u64::MAX, Script::new()));
    overflow.add_output(TransactionOutput::new(1, Script::new()));
    assert_eq!(overflow.total_output_amount().unwrap_err().kind(), ErrorKind::Arithmetic);

    let mut too_much = Transaction::new();
    too_much.add_output(TransactionOutput::new(crate::output::MAX_MONEY, Script::new()));
    too_much.add_output(TransactionOutput::new(1, Script::new()));
    assert_eq!(too_much.total_output_amount().unwrap_err().kind(), ErrorKind::Arithmetic);
}

#[test]
fn test_lock_time() {
    let legacy = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    assert_eq!(legacy.lock_time_kind(), LockTime::Height(410_393));
    assert!(legacy.is_lock_time_enabled());

    let mut tx = example_tx(false);
    tx.lock_time = 1_600_000_000;
    assert_eq!(tx.lock_time_kind(), LockTime::Timestamp(1_600_000_000));
    // Every input is final, so the lock time is not enforced.
    assert!(!tx.is_lock_time_enabled());
    tx.inputs[0].sequence = 0xffff_fffe;
    assert!(tx.is_lock_time_enabled());
    tx.lock_time = 0;
    assert!(!tx.is_lock_time_enabled());
}

// -----------------------------------------------------------------------
// Signature hashes
// -----------------------------------------------------------------------

#[test]
fn test_legacy_sighash() {
    let tx = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    let script_pubkey = Script::from_hex(LEGACY_FUNDING_SCRIPT_HEX).unwrap();
    let digest = tx.sig_hash(0, &script_pubkey).unwrap();
    assert_eq!(
        hex::encode(digest),
        "27e0c5994dec7824e56dec6b2fcb342eb7cdb0d0957c2fce9882f715e85d81a6"
    );
    // Pure function of its inputs.
    assert_eq!(tx.sig_hash(0, &script_pubkey).unwrap(), digest);
}

#[test]
fn test_legacy_sighash_ignores_existing_script_sig() {
    let signed = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    let mut stripped = signed.clone();
    stripped.inputs[0].install_unlocking(Script::new(), Witness::new());
    let script_pubkey = Script::from_hex(LEGACY_FUNDING_SCRIPT_HEX).unwrap();
    assert_eq!(
        signed.sig_hash(0, &script_pubkey).unwrap(),
        stripped.sig_hash(0, &script_pubkey).unwrap()
    );
}

#[test]
fn test_legacy_sighash_flag_variants() {
    let tx = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    let script_pubkey = Script::from_hex(LEGACY_FUNDING_SCRIPT_HEX).unwrap();
    let cases = [
        (SIGHASH_NONE, "a9025d8b70159aa14bf1819a341ba6fea94ca8c1a61c33f48763214af2bbfa99"),
        (SIGHASH_SINGLE, "7b6ffdc173494eb86fa8a89893cee9cdb6e4611622220dd2eac3a1571a507e92"),
        (SIGHASH_ALL | SIGHASH_ANYONECANPAY, "d598d6849114bb8573a0f51184fa46fb3ff7516ef4ba7a27356d691ff579c20d"),
        (SIGHASH_NONE | SIGHASH_ANYONECANPAY, "9527316bc8187d8f4261f07b0aa3db63af9c4e9aa2cdc4e6a325b1b9b4c8ee21"),
        (SIGHASH_SINGLE | SIGHASH_ANYONECANPAY, "26a64b6eeaec01c8ce05b905cf5fe9479b5311d1893cf28d13bf6d265cfb119a"),
    ];
    for (sighash_type, expected) in cases {
        let digest = tx.sig_hash_with_type(0, &script_pubkey, sighash_type).unwrap();
        assert_eq!(hex::encode(digest), expected, "sighash type {:#x}", sighash_type);
    }
}

#[test]
fn test_legacy_sighash_none_ignores_outputs() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    let script = bip143_script_code();
    let mut changed = tx.clone();
    changed.outputs[1].amount += 1;

    let none = |t: &Transaction| t.sig_hash_with_type(0, &script, SIGHASH_NONE).unwrap();
    let all = |t: &Transaction| t.sig_hash_with_type(0, &script, SIGHASH_ALL).unwrap();
    let single = |t: &Transaction| t.sig_hash_with_type(0, &script, SIGHASH_SINGLE).unwrap();
    assert_eq!(none(&tx), none(&changed));
    assert_eq!(single(&tx), single(&changed));
    assert_ne!(all(&tx), all(&changed));
}

#[test]
fn test_legacy_sighash_anyonecanpay_ignores_other_inputs() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    let script = bip143_script_code();
    let mut changed = tx.clone();
    changed.inputs[0].sequence = 0;
    changed.inputs[0].previous_index = 9;

    let acp = SIGHASH_ALL | SIGHASH_ANYONECANPAY;
    assert_eq!(
        tx.sig_hash_with_type(1, &script, acp).unwrap(),
        changed.sig_hash_with_type(1, &script, acp).unwrap()
    );
    assert_ne!(tx.sig_hash(1, &script).unwrap(), changed.sig_hash(1, &script).unwrap());
}

#[test]
fn test_legacy_sighash_single_without_output() {
    let mut tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    tx.outputs.truncate(1);
    let digest = tx.sig_hash_with_type(1, &bip143_script_code(), SIGHASH_SINGLE).unwrap();
    assert_eq!(digest, sighash::SIGHASH_SINGLE_BUG);
    assert_eq!(digest[0], 1);
    assert!(digest[1..].iter().all(|b| *b == 0));
}

#[test]
fn test_segwit_sighash_bip143_vector() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    let digest = tx.sig_hash_segwit(1, &bip143_script_code(), BIP143_AMOUNT).unwrap();
    assert_eq!(
        hex::encode(digest),
        "c37af31116d1b27caf68aae9e3ac82f1477929014d5b917657d0eb49478cb670"
    );
}

#[test]
fn test_segwit_sighash_flag_variants() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    let script_code = bip143_script_code();
    let cases = [
        (SIGHASH_NONE, "6ff11a9b87fb510a3a31af006bd3811b632f8a39d88a2bfda49cee203dcc356e"),
        (SIGHASH_SINGLE, "f4fe57286dd2ca8ac0e3dfccd54c352fcdcacbed80f194e264b75d7a7c74e4ce"),
        (SIGHASH_ALL | SIGHASH_ANYONECANPAY, "fc5b6bbc855883bcfdaefb77071740ccde4929f15e6a13286584e779b2529d91"),
        (SIGHASH_NONE | SIGHASH_ANYONECANPAY, "4abb5ef58a968f8e1ab88a9fb72f2ce74b3022e65d334ac7b8aeda747515dc15"),
        (SIGHASH_SINGLE | SIGHASH_ANYONECANPAY, "79ff9ff708f79ce8f7a4f90d62028533a99d7340b7fb3d819dfd9a599a78e39c"),
    ];
    for (sighash_type, expected) in cases {
        let digest = tx
            .sig_hash_segwit_with_type(1, &script_code, BIP143_AMOUNT, sighash_type)
            .unwrap();
        assert_eq!(hex::encode(digest), expected, "sighash type {:#x}", sighash_type);
    }
}

#[test]
fn test_segwit_sighash_commits_to_amount() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    let script_code = bip143_script_code();
    assert_ne!(
        tx.sig_hash_segwit(1, &script_code, BIP143_AMOUNT).unwrap(),
        tx.sig_hash_segwit(1, &script_code, BIP143_AMOUNT - 1).unwrap()
    );
}

#[test]
fn test_segwit_sighash_cache_matches_uncached() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    let script_code = bip143_script_code();
    let cache = SegwitSighashCache::new(&tx);
    for index in 0..tx.inputs.len() {
        let cached = sighash::segwit_signature_hash_cached(
            &tx,
            &cache,
            index,
            &script_code,
            BIP143_AMOUNT,
            SIGHASH_ALL,
        )
        .unwrap();
        assert_eq!(cached, tx.sig_hash_segwit(index, &script_code, BIP143_AMOUNT).unwrap());
    }
}

#[test]
fn test_segwit_preimage_layout() {
    let tx = Transaction::from_hex(BIP143_UNSIGNED_TX_HEX).unwrap();
    let script_code = bip143_script_code();
    let cache = SegwitSighashCache::new(&tx);
    let preimage =
        sighash::calc_segwit_preimage(&tx, &cache, 1, &script_code, BIP143_AMOUNT, SIGHASH_ALL)
            .unwrap();
    // 4 + 32 + 32 + 36 + (1 + 25) + 8 + 4 + 32 + 4 + 4
    assert_eq!(preimage.len(), 182);
    assert_eq!(&preimage[..4], &[1, 0, 0, 0]);
    assert_eq!(&preimage[4..36], &cache.hash_prevouts);
    assert_eq!(&preimage[36..68], &cache.hash_sequence);
    assert_eq!(&preimage[68..104], &tx.inputs[1].outpoint_bytes());
    assert_eq!(&preimage[104..130], script_code.serialize().as_slice());
    assert_eq!(&preimage[130..138], &BIP143_AMOUNT.to_le_bytes());
    assert_eq!(&preimage[142..174], &cache.hash_outputs);
    assert_eq!(&preimage[178..], &SIGHASH_ALL.to_le_bytes());
}

#[test]
fn test_sighash_index_out_of_range() {
    let tx = Transaction::from_hex(LEGACY_TX_HEX).unwrap();
    let script = Script::from_hex(LEGACY_FUNDING_SCRIPT_HEX).unwrap();
    assert_eq!(tx.sig_hash(1, &script).unwrap_err().kind(), ErrorKind::SignatureInput);
    assert_eq!(
        tx.sig_hash_segwit(5, &script, 1).unwrap_err().kind(),
        ErrorKind::SignatureInput
    );
}

// -----------------------------------------------------------------------
// Signing
// -----------------------------------------------------------------------

#[test]
fn test_sign_p2wpkh_example() {
    let key = example_key();
    let mut tx = example_tx(true);
    assert_eq!(tx.signing_state(), SigningState::Unsigned);

    sign_input(&mut tx, &key, 0, 10_000, true).expect("signing should succeed");

    assert_eq!(tx.to_hex(), EXAMPLE_SIGNED_P2WPKH_HEX);
    assert_eq!(tx.signing_state(), SigningState::FullySigned);
    assert!(tx.inputs[0].script_sig().is_empty());
    assert_eq!(
        tx.txid().to_string(),
        "7725f56f6c59c2e56eb4a69c440e8b3764e3acc9e05d1d512ffbdd07d5d8ef2b"
    );
}

#[test]
fn test_sign_p2wpkh_signature_verifies() {
    let key = example_key();
    let mut tx = example_tx(true);
    let script_code = Script::p2pkh(&key.pub_key().hash160());
    let digest = tx.sig_hash_segwit(0, &script_code, 10_000).unwrap();

    sign_input(&mut tx, &key, 0, 10_000, true).unwrap();

    let witness = tx.inputs[0].witness();
    let sig_with_type = witness.get(0).unwrap();
    assert_eq!(*sig_with_type.last().unwrap(), SIGHASH_ALL as u8);
    let signature = Signature::from_der(&sig_with_type[..sig_with_type.len() - 1]).unwrap();
    assert!(signature.is_low_s());
    assert!(key.pub_key().verify(&digest, &signature));
    assert_eq!(witness.get(1).unwrap(), &key.pub_key().to_compressed()[..]);
}

#[test]
fn test_sign_legacy_p2pkh() {
    let key = example_key();
    let mut tx = example_tx(false);
    sign_input(&mut tx, &key, 0, 10_000, false).unwrap();
    assert_eq!(tx.to_hex(), EXAMPLE_SIGNED_P2PKH_HEX);
    assert!(!tx.is_segwit);
    assert!(tx.inputs[0].witness().is_empty());
}

#[test]
fn test_sign_for_script_picks_path() {
    let key = example_key();
    let pkh = key.pub_key().hash160();

    let mut native = example_tx(true);
    sign_input_for_script(&mut native, &key, 0, 10_000, &Script::p2wpkh(&pkh)).unwrap();
    assert_eq!(native.to_hex(), EXAMPLE_SIGNED_P2WPKH_HEX);

    let mut legacy = example_tx(false);
    sign_input_for_script(&mut legacy, &key, 0, 10_000, &Script::p2pkh(&pkh)).unwrap();
    assert_eq!(legacy.to_hex(), EXAMPLE_SIGNED_P2PKH_HEX);

    // Nested signing switches a legacy-declared transaction to the segwit form.
    let mut nested = example_tx(false);
    let funding = Script::p2sh_p2wpkh(&pkh);
    assert_eq!(funding.to_hex(), "a91410a7e5e0da5c1d7a5f29275c0885d60985b8bb8f87");
    sign_input_for_script(&mut nested, &key, 0, 10_000, &funding).unwrap();
    assert!(nested.is_segwit);
    assert_eq!(nested.to_hex(), EXAMPLE_SIGNED_NESTED_HEX);
}

#[test]
fn test_sign_for_unsupported_script_leaves_input_untouched() {
    let key = example_key();
    let mut tx = example_tx(true);
    let before = tx.clone();

    let taproot = Script::from_hex(EXAMPLE_TAPROOT_SCRIPT).unwrap();
    let err = sign_input_for_script(&mut tx, &key, 0, 10_000, &taproot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInput);
    assert_eq!(tx, before);

    let other_key = [0x11u8; 20];
    let err = sign_input_for_script(&mut tx, &key, 0, 10_000, &Script::p2pkh(&other_key))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInput);
    assert_eq!(tx, before);

    let err = sign_input_for_script(&mut tx, &key, 0, 10_000, &Script::p2sh(&other_key))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInput);
    assert_eq!(tx, before);
}

#[test]
fn test_sign_index_out_of_range_leaves_tx_untouched() {
    let key = example_key();
    let mut tx = example_tx(true);
    let before = tx.clone();
    let err = sign_input(&mut tx, &key, 1, 10_000, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInput);
    assert_eq!(tx, before);
}

#[test]
fn test_signing_state_progression() {
    let key = example_key();
    let mut tx = example_tx(true);
    tx.add_input(
        TransactionInput::new(Hash::from_hex(EXAMPLE_PREV_TXID).unwrap(), 2)
            .with_sequence(0xffff_fffd),
    );
    assert_eq!(tx.signing_state(), SigningState::Unsigned);

    sign_input(&mut tx, &key, 1, 5_000, true).unwrap();
    assert_eq!(tx.signing_state(), SigningState::PartiallySigned);
    assert!(!tx.inputs[0].has_unlocking_data());

    sign_input(&mut tx, &key, 0, 10_000, true).unwrap();
    assert_eq!(tx.signing_state(), SigningState::FullySigned);

    let reparsed = Transaction::from_bytes(&tx.to_bytes()).unwrap();
    assert_eq!(reparsed, tx);
}

#[test]
fn test_signer_with_custom_sighash_type() {
    let key = example_key();
    let mut tx = example_tx(true);
    let sighash_type = SIGHASH_SINGLE | SIGHASH_ANYONECANPAY;
    let signer = Signer::new(SignerConfig { sighash_type });
    signer.sign_input(&mut tx, &key, 0, 10_000, true).unwrap();

    let sig = tx.inputs[0].witness().get(0).unwrap();
    assert_eq!(*sig.last().unwrap(), 0x83);

    let script_code = Script::p2pkh(&key.pub_key().hash160());
    let digest = example_tx(true)
        .sig_hash_segwit_with_type(0, &script_code, 10_000, sighash_type)
        .unwrap();
    let signature = Signature::from_der(&sig[..sig.len() - 1]).unwrap();
    assert!(key.pub_key().verify(&digest, &signature));
}

#[test]
fn test_signer_rejects_unknown_sighash_type() {
    let key = example_key();
    let mut tx = example_tx(true);
    let before = tx.clone();
    let signer = Signer::new(SignerConfig { sighash_type: 0x41 });
    let err = signer.sign_input(&mut tx, &key, 0, 10_000, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInput);
    assert_eq!(tx, before);
}
