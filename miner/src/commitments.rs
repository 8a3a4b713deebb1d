//! Coinbase data committing to the block contents.

use crate::Error;
use bitcrypto::{dhash256, zero_hash};
use chain::script::{is_witness_commitment_script, witness_commitment_script};
use chain::{Block, IndexedTransaction, Transaction, TransactionOutput};
use network::ConsensusParams;
use storage::ChainState;

/// Position of the witness commitment output of `block`'s coinbase.
///
/// With several candidates the last one counts.
pub fn witness_commitment_index(block: &Block) -> Option<usize> {
	let coinbase = block.coinbase()?;
	coinbase
		.raw
		.outputs
		.iter()
		.rposition(|output| is_witness_commitment_script(&output.script_pubkey))
}

fn update_coinbase<F>(block: &mut Block, update: F)
where
	F: FnOnce(&mut Transaction),
{
	if let Some(coinbase) = block.transactions.first_mut() {
		let mut raw = coinbase.raw.clone();
		update(&mut raw);
		*coinbase = IndexedTransaction::from_raw(raw);
	}
}

/// Adds the BIP141 witness commitment to the coinbase of a block at `height`,
/// unless one is present already or segwit is not active.
///
/// Returns the commitment output script.
pub fn generate_coinbase_commitment(block: &mut Block, consensus: &ConsensusParams, height: u32) -> Option<Vec<u8>> {
	if !consensus.is_segwit_active(height) || block.coinbase().is_none() {
		return None;
	}

	let reserved_value = zero_hash();
	let commitment = match witness_commitment_index(block) {
		Some(index) => block.transactions[0].raw.outputs[index].script_pubkey.clone(),
		None => {
			let witness_root = block.witness_merkle_root();
			let mut data = Vec::with_capacity(64);
			data.extend_from_slice(&witness_root[..]);
			data.extend_from_slice(&reserved_value[..]);
			let script = witness_commitment_script(&dhash256(&data));
			let output = TransactionOutput {
				value: 0,
				script_pubkey: script.clone(),
			};
			update_coinbase(block, |coinbase| coinbase.outputs.push(output));
			script
		}
	};

	// the coinbase witness carries the reserved value
	if !block.transactions[0].raw.inputs[0].has_witness() {
		update_coinbase(block, |coinbase| coinbase.inputs[0].script_witness = vec![reserved_value[..].to_vec()]);
	}

	Some(commitment)
}

/// Recomputes the witness commitment and merkle root after `block.transactions` changed.
pub fn regenerate_commitments(block: &mut Block, chain: &dyn ChainState) -> Result<(), Error> {
	let parent = chain
		.block_index(&block.block_header.previous_header_hash)
		.ok_or(Error::UnknownParent)?;

	if let Some(index) = witness_commitment_index(block) {
		update_coinbase(block, |coinbase| {
			coinbase.outputs.remove(index);
		});
	}
	generate_coinbase_commitment(block, chain.consensus(), parent.height + 1);
	block.block_header.merkle_root_hash = block.merkle_root();
	Ok(())
}

/// Installs a coinbase and the header fields chosen by the miner.
pub fn add_merkle_root_and_coinbase(block: &mut Block, coinbase: IndexedTransaction, version: u32, time: u32, nonce: u32) {
	if block.transactions.is_empty() {
		block.transactions.push(coinbase);
	} else {
		block.transactions[0] = coinbase;
	}
	block.block_header.version = version;
	block.block_header.time = time;
	block.block_header.nonce = nonce;
	block.block_header.merkle_root_hash = block.merkle_root();
}
