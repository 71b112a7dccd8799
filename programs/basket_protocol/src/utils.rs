use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use solana_sha256_hasher::hashv;

use crate::errors::BasketError;

// Ed25519SigVerify111111111111111111111111111
pub fn ed25519_program_id() -> Pubkey {
    Pubkey::new_from_array([
        3, 125, 70, 214, 124, 147, 251, 190, 18, 249, 66, 143, 131, 141, 64, 255,
        5, 112, 116, 73, 39, 244, 138, 100, 252, 202, 112, 68, 128, 0, 0, 0,
    ])
}

// -----------------
// Seeds
// -----------------
pub const REGISTRY_SEED: &[u8] = b"registry_v1";
pub const BASKET_SEED: &[u8] = b"basket_v1";
pub const BASKET_MINT_SEED: &[u8] = b"basket_mint_v1";
pub const BROKER_SEED: &[u8] = b"broker_v1";
pub const POT_SEED: &[u8] = b"pot_v1";
pub const CUSTODY_SEED: &[u8] = b"custody_v1";
pub const ENTRY_SEED: &[u8] = b"entry_v1";
pub const REQUEST_SEED: &[u8] = b"request_v1";

// ---------------
// View payloads
// ---------------
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryRecord {
    pub participant: Pubkey,
    pub weight: u64,
    pub sequence: u64,
}

// -------------------------
// Randomness correlation
// -------------------------
pub fn request_correlation(
    broker: &Pubkey,
    request_id: u64,
    draw_start: u64,
    draw_end: u64,
    slot: u64,
) -> [u8; 32] {
    hashv(&[
        b"basket-protocol:request".as_ref(),
        broker.as_ref(),
        request_id.to_le_bytes().as_ref(),
        draw_start.to_le_bytes().as_ref(),
        draw_end.to_le_bytes().as_ref(),
        slot.to_le_bytes().as_ref(),
    ])
    .to_bytes()
}

/// Message the oracle signs to fulfill a request.
pub fn expected_randomness_msg(
    program_id: &Pubkey,
    broker: &Pubkey,
    request_id: u64,
    correlation: &[u8; 32],
    value: &[u8; 32],
) -> Vec<u8> {
    let tag = b"basket-protocol:randomness_v1";
    let mut out = Vec::with_capacity(tag.len() + 32 + 32 + 8 + 32 + 32);
    out.extend_from_slice(tag);
    out.extend_from_slice(program_id.as_ref());
    out.extend_from_slice(broker.as_ref());
    out.extend_from_slice(&request_id.to_le_bytes());
    out.extend_from_slice(correlation);
    out.extend_from_slice(value);
    out
}

// -------------------------
// Ed25519 instruction parsing
// -------------------------
pub fn parse_ed25519_ix_pubkey_and_msg(ix: &Instruction) -> Result<(Pubkey, Vec<u8>)> {
    require!(
        ix.program_id == ed25519_program_id(),
        BasketError::MissingOrInvalidEd25519Ix
    );

    let data = &ix.data;
    require!(data.len() >= 16, BasketError::MissingOrInvalidEd25519Ix);

    let num_sigs = data[0];
    require!(num_sigs == 1, BasketError::MissingOrInvalidEd25519Ix);

    // offsets must point into this same instruction (index == u16::MAX)
    let sig_ix = u16::from_le_bytes([data[4], data[5]]);
    let pk_ix = u16::from_le_bytes([data[8], data[9]]);
    let msg_ix = u16::from_le_bytes([data[14], data[15]]);
    require!(sig_ix == u16::MAX, BasketError::MissingOrInvalidEd25519Ix);
    require!(pk_ix == u16::MAX, BasketError::MissingOrInvalidEd25519Ix);
    require!(msg_ix == u16::MAX, BasketError::MissingOrInvalidEd25519Ix);

    let pk_off = u16::from_le_bytes([data[6], data[7]]) as usize;
    let msg_off = u16::from_le_bytes([data[10], data[11]]) as usize;
    let msg_sz = u16::from_le_bytes([data[12], data[13]]) as usize;

    require!(pk_off + 32 <= data.len(), BasketError::MissingOrInvalidEd25519Ix);
    require!(msg_off + msg_sz <= data.len(), BasketError::MissingOrInvalidEd25519Ix);

    let pk_bytes: [u8; 32] = data[pk_off..pk_off + 32]
        .try_into()
        .map_err(|_| error!(BasketError::MissingOrInvalidEd25519Ix))?;
    let msg = data[msg_off..msg_off + msg_sz].to_vec();

    Ok((Pubkey::new_from_array(pk_bytes), msg))
}

pub fn assert_ed25519_ix_matches(
    ix: &Instruction,
    expected_pubkey: &Pubkey,
    expected_msg: &[u8],
) -> Result<()> {
    let (pk, msg) = parse_ed25519_ix_pubkey_and_msg(ix)?;

    require_keys_eq!(pk, *expected_pubkey, BasketError::Ed25519PubkeyMismatch);
    require!(msg.as_slice() == expected_msg, BasketError::Ed25519MessageMismatch);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16le(v: u16) -> [u8; 2] {
        v.to_le_bytes()
    }

    /// Builds ed25519-program instruction data with the standard layout:
    /// [num_sigs: u8, padding: u8, offsets(14 bytes), signature(64), pubkey(32), msg(N)]
    /// The signature is zeroed; only the parser is exercised here.
    fn make_ed25519_ix(pubkey: [u8; 32], msg: &[u8], sig_ix: u16, pk_ix: u16, msg_ix: u16) -> Instruction {
        let header_len: usize = 2 + 14;
        let sig_off: u16 = header_len as u16;
        let pk_off: u16 = sig_off + 64;
        let msg_off: u16 = pk_off + 32;
        let msg_sz: u16 = msg
            .len()
            .try_into()
            .expect("message too long for u16 size in this test");

        let mut data = vec![0u8; header_len + 64 + 32 + msg.len()];
        data[0] = 1;

        let o = 2usize;
        data[o..o + 2].copy_from_slice(&u16le(sig_off));
        data[o + 2..o + 4].copy_from_slice(&u16le(sig_ix));
        data[o + 4..o + 6].copy_from_slice(&u16le(pk_off));
        data[o + 6..o + 8].copy_from_slice(&u16le(pk_ix));
        data[o + 8..o + 10].copy_from_slice(&u16le(msg_off));
        data[o + 10..o + 12].copy_from_slice(&u16le(msg_sz));
        data[o + 12..o + 14].copy_from_slice(&u16le(msg_ix));

        let pk_start = pk_off as usize;
        let msg_start = msg_off as usize;
        data[pk_start..pk_start + 32].copy_from_slice(&pubkey);
        data[msg_start..msg_start + msg.len()].copy_from_slice(msg);

        Instruction {
            program_id: ed25519_program_id(),
            accounts: vec![],
            data,
        }
    }

    #[test]
    fn ed25519_program_id_matches_native_program() {
        use std::str::FromStr;
        let expected = Pubkey::from_str("Ed25519SigVerify111111111111111111111111111").unwrap();
        assert_eq!(ed25519_program_id(), expected);
    }

    #[test]
    fn parse_ed25519_accepts_self_contained_indices() {
        let oracle = Pubkey::new_unique();
        let msg = b"fulfill".to_vec();

        let ix = make_ed25519_ix(oracle.to_bytes(), &msg, u16::MAX, u16::MAX, u16::MAX);

        let (pk, parsed_msg) = parse_ed25519_ix_pubkey_and_msg(&ix).expect("should parse");
        assert_eq!(pk, oracle);
        assert_eq!(parsed_msg, msg);
    }

    #[test]
    fn parse_ed25519_rejects_external_message_instruction_index() {
        let oracle = Pubkey::new_unique();
        let ix = make_ed25519_ix(oracle.to_bytes(), b"evil", u16::MAX, u16::MAX, 0);

        assert!(parse_ed25519_ix_pubkey_and_msg(&ix).is_err());
    }

    #[test]
    fn parse_ed25519_rejects_other_programs() {
        let oracle = Pubkey::new_unique();
        let mut ix = make_ed25519_ix(oracle.to_bytes(), b"msg", u16::MAX, u16::MAX, u16::MAX);
        ix.program_id = Pubkey::new_unique();

        assert!(parse_ed25519_ix_pubkey_and_msg(&ix).is_err());
    }

    #[test]
    fn oracle_attestation_binds_request_and_value() {
        let program_id = Pubkey::new_unique();
        let broker = Pubkey::new_unique();
        let oracle = Pubkey::new_unique();
        let correlation = request_correlation(&broker, 3, 0, 12, 9_001);
        let value = [42u8; 32];

        let msg = expected_randomness_msg(&program_id, &broker, 3, &correlation, &value);
        let ix = make_ed25519_ix(oracle.to_bytes(), &msg, u16::MAX, u16::MAX, u16::MAX);
        assert!(assert_ed25519_ix_matches(&ix, &oracle, &msg).is_ok());

        // another request id
        let other = expected_randomness_msg(&program_id, &broker, 4, &correlation, &value);
        assert!(assert_ed25519_ix_matches(&ix, &oracle, &other).is_err());

        // another value
        let forged = expected_randomness_msg(&program_id, &broker, 3, &correlation, &[7u8; 32]);
        assert!(assert_ed25519_ix_matches(&ix, &oracle, &forged).is_err());

        // another signer
        assert!(assert_ed25519_ix_matches(&ix, &Pubkey::new_unique(), &msg).is_err());
    }

    #[test]
    fn correlation_depends_on_every_input() {
        let broker = Pubkey::new_unique();
        let base = request_correlation(&broker, 1, 0, 5, 100);

        assert_eq!(base, request_correlation(&broker, 1, 0, 5, 100));
        assert_ne!(base, request_correlation(&Pubkey::new_unique(), 1, 0, 5, 100));
        assert_ne!(base, request_correlation(&broker, 2, 0, 5, 100));
        assert_ne!(base, request_correlation(&broker, 1, 1, 5, 100));
        assert_ne!(base, request_correlation(&broker, 1, 0, 6, 100));
        assert_ne!(base, request_correlation(&broker, 1, 0, 5, 101));
    }
}
