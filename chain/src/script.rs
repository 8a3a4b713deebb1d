//! The subset of script handling a block template needs: number pushes for the
//! coinbase height, witness commitment outputs and legacy sigop counting.

use crate::transaction::Transaction;
use bitcrypto::SHA256D;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = OP_1;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

/// Sigops counted for a bare CHECKMULTISIG when counting inaccurately.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// BIP141 commitment header: `OP_RETURN` push of 36 bytes starting with `0xaa21a9ed`.
pub const WITNESS_COMMITMENT_HEADER: [u8; 4] = [0xaa, 0x21, 0xa9, 0xed];
const WITNESS_COMMITMENT_SCRIPT_LEN: usize = 38;

/// Appends a minimally encoded number push to `script`.
pub fn push_num(script: &mut Vec<u8>, n: i64) {
	if n == 0 {
		script.push(OP_0);
		return;
	}
	if n == -1 || (n >= 1 && n <= 16) {
		script.push((OP_1 as i64 + n - 1) as u8);
		return;
	}

	let negative = n < 0;
	let mut abs = n.unsigned_abs();
	let mut bytes = Vec::with_capacity(9);
	while abs > 0 {
		bytes.push((abs & 0xff) as u8);
		abs >>= 8;
	}
	// the most significant byte carries the sign bit
	let last = bytes.len() - 1;
	if bytes[last] & 0x80 != 0 {
		bytes.push(if negative { 0x80 } else { 0x00 });
	} else if negative {
		bytes[last] |= 0x80;
	}

	script.push(bytes.len() as u8);
	script.extend_from_slice(&bytes);
}

/// Coinbase script-sig prefix committing to the block height (BIP34).
pub fn height_script(height: u32) -> Vec<u8> {
	let mut script = Vec::with_capacity(5);
	push_num(&mut script, height as i64);
	script
}

/// `OP_RETURN` output script carrying the witness commitment.
pub fn witness_commitment_script(commitment: &SHA256D) -> Vec<u8> {
	let mut script = Vec::with_capacity(WITNESS_COMMITMENT_SCRIPT_LEN);
	script.push(OP_RETURN);
	script.push(0x24);
	script.extend_from_slice(&WITNESS_COMMITMENT_HEADER);
	script.extend_from_slice(&commitment[..]);
	script
}

pub fn is_witness_commitment_script(script: &[u8]) -> bool {
	script.len() >= WITNESS_COMMITMENT_SCRIPT_LEN && script[0] == OP_RETURN && script[1] == 0x24 && script[2..6] == WITNESS_COMMITMENT_HEADER
}

/// Counts signature operations the pre-segwit way, treating every multisig as 20 keys.
pub fn legacy_sigops_count(script: &[u8]) -> usize {
	let mut count = 0;
	let mut pc = 0;
	while pc < script.len() {
		let opcode = script[pc];
		pc += 1;
		let push_len = match opcode {
			0x01..=0x4b => opcode as usize,
			OP_PUSHDATA1 => match script.get(pc) {
				Some(len) => {
					pc += 1;
					*len as usize
				}
				None => break,
			},
			OP_PUSHDATA2 => match script.get(pc..pc + 2) {
				Some(len) => {
					pc += 2;
					u16::from_le_bytes([len[0], len[1]]) as usize
				}
				None => break,
			},
			OP_PUSHDATA4 => match script.get(pc..pc + 4) {
				Some(len) => {
					pc += 4;
					u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize
				}
				None => break,
			},
			OP_CHECKSIG | OP_CHECKSIGVERIFY => {
				count += 1;
				0
			}
			OP_CHECKMULTISIG | OP_CHECKMULTISIGVERIFY => {
				count += MAX_PUBKEYS_PER_MULTISIG;
				0
			}
			_ => 0,
		};
		if push_len > script.len() - pc {
			break;
		}
		pc += push_len;
	}
	count
}

/// Legacy sigops of every input and output script of `transaction`.
pub fn transaction_legacy_sigops(transaction: &Transaction) -> usize {
	let inputs: usize = transaction.inputs.iter().map(|input| legacy_sigops_count(&input.script_sig)).sum();
	let outputs: usize = transaction
		.outputs
		.iter()
		.map(|output| legacy_sigops_count(&output.script_pubkey))
		.sum();
	inputs + outputs
}
