use clap::ValueEnum;
use mars_rover_core::{GridSize, Position, Report};
use serde::Serialize;

/// Delimiter placed between the output lines of consecutive sequences.
const LINE_DELIMITER: &str = "\n";

/// Encoding used for stdout and the output file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One `x:y:D` line per command sequence.
    #[default]
    Text,
    /// Pretty-printed JSON document with the mission and every report.
    Json,
}

/// Results of a complete mission run, in sequence order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Transcript {
    grid: GridSize,
    obstacles: Vec<Position>,
    reports: Vec<Report>,
}

impl Transcript {
    pub(crate) fn new(grid: GridSize, obstacles: Vec<Position>, reports: Vec<Report>) -> Self {
        Self {
            grid,
            obstacles,
            reports,
        }
    }

    /// Encodes the transcript in the requested format.
    pub(crate) fn encode(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.encode_text()),
            OutputFormat::Json => {
                let document = SerializableTranscript {
                    width: self.grid.width().get(),
                    height: self.grid.height().get(),
                    obstacles: &self.obstacles,
                    results: self
                        .reports
                        .iter()
                        .map(|report| SerializableReport {
                            output: report.to_string(),
                            report: *report,
                        })
                        .collect(),
                };
                serde_json::to_string_pretty(&document)
            }
        }
    }

    fn encode_text(&self) -> String {
        self.reports
            .iter()
            .map(Report::to_string)
            .collect::<Vec<_>>()
            .join(LINE_DELIMITER)
    }
}

#[derive(Serialize)]
struct SerializableTranscript<'a> {
    width: u32,
    height: u32,
    obstacles: &'a [Position],
    results: Vec<SerializableReport>,
}

#[derive(Serialize)]
struct SerializableReport {
    output: String,
    #[serde(flatten)]
    report: Report,
}
