use crate::import::ImportResult;
use common::types::gtfs::TransferRecord;
use log::info;
use polars::df;
use polars::prelude::{CsvWriter, SerWriter};
use routing::transfers::MIN_TIME_TRANSFER_TYPE;
use std::fs::File;
use std::path::Path;

/// Writes transfers as a GTFS transfers file, so generated footpaths can be reviewed and reused
pub fn export_transfers(transfers: &[TransferRecord], path: &Path) -> ImportResult<()> {
    let mut frame = df!(
        "from_stop_id" => transfers.iter().map(|transfer| transfer.from_stop_id.as_str()).collect::<Vec<_>>(),
        "to_stop_id" => transfers.iter().map(|transfer| transfer.to_stop_id.as_str()).collect::<Vec<_>>(),
        "transfer_type" => vec![MIN_TIME_TRANSFER_TYPE; transfers.len()],
        "min_transfer_time" => transfers.iter().map(|transfer| transfer.min_transfer_time.as_str()).collect::<Vec<_>>(),
    )?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(&mut frame)?;

    info!(target: "import", "Wrote {} transfers to {}", transfers.len(), path.display());
    Ok(())
}
