use anyhow::Context;
use chainschema::{Decoder, Fingerprint};
use clap::Parser;
use std::path::PathBuf;

/// Decode a versioned item using chain tables, and print the result as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Opts {
	/// JSON chain tables to load. May be given more than once, one file per chain.
	#[arg(long = "tables", required = true)]
	tables: Vec<PathBuf>,
	/// The chain the item belongs to.
	#[arg(long)]
	chain: String,
	/// The item name, eg "Balances.transfer".
	#[arg(long)]
	item: String,
	/// The fingerprint the runtime declares for the item, as 0x prefixed hex.
	#[arg(long)]
	fingerprint: Fingerprint,
	/// The encoded item in the form 0x1a2b3c
	bytes: String,
}

fn main() -> Result<(), anyhow::Error> {
	let opts = Opts::parse();
	pretty_env_logger::init();

	let mut decoder = Decoder::new();
	for path in &opts.tables {
		let json = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
		decoder.register_tables(&json).with_context(|| format!("Cannot load tables from {}", path.display()))?;
	}

	let bytes = match opts.bytes.strip_prefix("0x") {
		Some(bytes) => bytes,
		None => anyhow::bail!("Bytes should start with 0x"),
	};
	let bytes = match hex::decode(bytes) {
		Ok(bytes) => bytes,
		Err(e) => anyhow::bail!("Cannot decode hex string into bytes: {}", e),
	};

	// Trailing bytes are logged by the decoder.
	let item = decoder.decode_item(&opts.chain, &opts.item, &opts.fingerprint, &bytes)?;
	println!("{}", serde_json::to_string_pretty(&item.value)?);
	Ok(())
}
