use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::json;

use crate::error::SimResult;
use crate::top::Top;

/// JSON-lines trace of the downstream port, one line per cycle
pub struct TraceWriter {
  writer: BufWriter<File>,
}

impl TraceWriter {
  pub fn create(path: &Path) -> SimResult<Self> {
    Ok(Self {
      writer: BufWriter::new(File::create(path)?),
    })
  }

  pub fn record(&mut self, cycle: u64, top: &Top) -> SimResult<()> {
    writeln!(self.writer, "{}", cycle_entry(cycle, top))?;
    Ok(())
  }

  pub fn flush(&mut self) -> SimResult<()> {
    self.writer.flush()?;
    Ok(())
  }
}

pub fn cycle_entry(cycle: u64, top: &Top) -> serde_json::Value {
  let dfii = &top.dfii;
  let phases: Vec<_> = dfii
    .master
    .phases
    .iter()
    .map(|phase| {
      json!({
        "command": phase.command(),
        "address": format!("{:#x}", phase.address),
        "bank": phase.bank,
        "wrdata_en": phase.wrdata_en,
        "rddata_en": phase.rddata_en,
        "wrdata": phase.wrdata_en.then(|| format!("{:#x}", phase.wrdata)),
      })
    })
    .collect();

  let mode = if dfii.manual_selected() { "manual" } else { "automatic" };
  json!({
    "cycle": cycle,
    "mode": mode,
    "phases": phases,
    "sideband": dfii.sideband.first(),
  })
}
