use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use csv::Writer;

use crate::errors::{GrainSizeError, Result};
use crate::measurement::ImageMeasurement;

pub const RESULT_FILE_NAME: &str = "result.dat";
pub const SUMMARY_FILE_NAME: &str = "summary.csv";

/// Plain-text run log written to `<output>/result.dat`
///
/// Blocks are written atomically so parallel workers do not interleave lines.
pub struct ResultLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl ResultLog {
    /// Create (or truncate) the result file in `output_dir`
    pub fn create<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let path = output_dir.join(RESULT_FILE_NAME);
        let file = File::create(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Echo `lines` to the log and append them to the result file
    pub fn write_block<S: AsRef<str>>(&self, lines: &[S]) -> Result<()> {
        let mut text = String::new();
        for line in lines {
            log::info!("{}", line.as_ref());
            text.push_str(line.as_ref());
            text.push('\n');
        }

        let mut file = self.file.lock().map_err(|_| {
            GrainSizeError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "result log lock poisoned",
            ))
        })?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        Ok(())
    }
}

/// Human-readable per-line diameters and their mean
pub fn format_measurement_report(name: &str, measurement: &ImageMeasurement) -> Vec<String> {
    let mut lines = Vec::with_capacity(measurement.lines.len() + 2);
    lines.push(name.to_string());
    for line in &measurement.lines {
        lines.push(format!(" D_{} = {} [px]", line.index, line.diameter));
    }
    lines.push(format!(" D_ave = {} [px]", measurement.mean_diameter));
    lines
}

/// Write the per-line breakdown of one image to `<output>/lines/<filename>.csv`
pub fn write_lines_csv<P: AsRef<Path>>(
    measurement: &ImageMeasurement,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = output_dir.as_ref().join("lines").join(format!("{}.csv", filename));

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record(&[
        "Line_Index",
        "Start_X",
        "Start_Y",
        "End_X",
        "End_Y",
        "Length_px",
        "Group_Count",
        "Diameter_px",
    ])?;

    for line in &measurement.lines {
        writer.write_record(&[
            line.index.to_string(),
            line.line.start.0.to_string(),
            line.line.start.1.to_string(),
            line.line.end.0.to_string(),
            line.line.end.1.to_string(),
            format!("{:.6}", line.line.length),
            line.group_count.to_string(),
            format!("{:.6}", line.diameter),
        ])?;
    }

    writer.flush()?;

    Ok(output_path)
}

/// Append one row per image to `<output>/summary.csv`, writing the header on creation
pub fn append_summary_csv<P: AsRef<Path>>(
    output_dir: P,
    filename: &str,
    measurement: &ImageMeasurement,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let summary_path = output_dir.join(SUMMARY_FILE_NAME);
    let file_exists = summary_path.exists();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&summary_path)?;
    let mut writer = Writer::from_writer(file);

    if !file_exists {
        writer.write_record(&["ID", "Width", "Height", "Lines", "Attempts", "Mean_Diameter_px"])?;
    }

    writer.write_record(&[
        filename.to_string(),
        measurement.width.to_string(),
        measurement.height.to_string(),
        measurement.lines.len().to_string(),
        measurement.attempts.to_string(),
        format!("{:.6}", measurement.mean_diameter),
    ])?;

    writer.flush()?;

    Ok(())
}

/// Dump the full measurement of one image to `<output>/json/<filename>.json`
pub fn write_measurement_json<P: AsRef<Path>>(
    measurement: &ImageMeasurement,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = output_dir.as_ref().join("json").join(format!("{}.json", filename));

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(&output_path)?;
    serde_json::to_writer_pretty(file, measurement)?;

    Ok(output_path)
}
