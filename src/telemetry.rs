//! Telemetry input: a worker thread parses a line stream into samples
//! and hands them to the panel over a channel.
//!
//! One line is one sample: whitespace-separated fields, altitude first,
//! then optional heading (degrees) and gauge value. Malformed lines are
//! logged and skipped. The worker stops on EOF or once the receiving
//! side hangs up.

use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

/// One parsed telemetry line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    pub altitude: f64,
    pub heading: Option<f64>,
    pub gauge: Option<f64>,
}

impl TelemetrySample {
    /// Parse a single line. Empty lines and lines starting with `#`
    /// yield `None`; anything else must begin with a float altitude.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut fields = line.split_whitespace();
        let altitude = parse_field(fields.next(), "altitude")?;
        let heading = fields.next().map(|f| parse_field(Some(f), "heading")).transpose()?;
        let gauge = fields.next().map(|f| parse_field(Some(f), "gauge")).transpose()?;
        if fields.next().is_some() {
            return Err(format!("too many fields in {line:?}"));
        }
        Ok(Some(Self {
            altitude,
            heading,
            gauge,
        }))
    }
}

fn parse_field(field: Option<&str>, name: &str) -> Result<f64, String> {
    let raw = field.ok_or_else(|| format!("missing {name}"))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("bad {name} {raw:?}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("non-finite {name} {raw:?}"))
    }
}

/// Spawn the reader worker. It owns the stream; a failed send means
/// the panel is gone and the worker exits. The returned handle lets
/// tests join a worker fed from a finite stream. Callers on a blocking
/// stream should detach it instead: a stalled stream only unblocks at
/// process exit, so joining there could hang shutdown.
pub fn spawn_reader<R>(reader: R, sender: Sender<TelemetrySample>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("telemetry read error: {err}");
                    break;
                }
            };
            match TelemetrySample::parse(&line) {
                Ok(Some(sample)) => {
                    debug!("telemetry sample: {sample:?}");
                    if sender.send(sample).is_err() {
                        info!("telemetry receiver gone, stopping reader");
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!("telemetry line skipped: {err}"),
            }
        }
        info!("telemetry stream ended");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    #[test]
    fn parses_all_three_fields() {
        let sample = TelemetrySample::parse("1234.5 270 11.2").unwrap().unwrap();
        assert_eq!(sample.altitude, 1234.5);
        assert_eq!(sample.heading, Some(270.0));
        assert_eq!(sample.gauge, Some(11.2));
    }

    #[test]
    fn altitude_alone_is_enough() {
        let sample = TelemetrySample::parse("42").unwrap().unwrap();
        assert_eq!(sample.altitude, 42.0);
        assert_eq!(sample.heading, None);
        assert_eq!(sample.gauge, None);
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        assert_eq!(TelemetrySample::parse("").unwrap(), None);
        assert_eq!(TelemetrySample::parse("  # calibration run").unwrap(), None);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(TelemetrySample::parse("up").is_err());
        assert!(TelemetrySample::parse("1.0 north").is_err());
        assert!(TelemetrySample::parse("nan").is_err());
        assert!(TelemetrySample::parse("1 2 3 4").is_err());
    }

    #[test]
    fn worker_streams_samples_in_order() {
        let input = Cursor::new("100\nbogus\n200 90\n");
        let (tx, rx) = mpsc::channel();
        let handle = spawn_reader(input, tx);
        handle.join().unwrap();
        let samples: Vec<TelemetrySample> = rx.iter().collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].altitude, 100.0);
        assert_eq!(samples[1].altitude, 200.0);
        assert_eq!(samples[1].heading, Some(90.0));
    }

    #[test]
    fn worker_stops_when_receiver_is_dropped() {
        let input = Cursor::new("1\n2\n3\n");
        let (tx, rx) = mpsc::channel();
        drop(rx);
        // Must terminate instead of looping on send errors.
        spawn_reader(input, tx).join().unwrap();
    }
}
