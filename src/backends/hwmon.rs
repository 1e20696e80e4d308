//! hwmon sensor backend
//!
//! Discovers sensors by scanning `/sys/class/hwmon` chip directories for
//! `<type><n>_input` channels and re-reads those files on demand.

use crate::core::{accuracy, Reading, SensorBackend, SensorDescriptor, SensorId, SensorKind};
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const HWMON_ROOT: &str = "/sys/class/hwmon";

/// Assumed floor between two hwmon reads, in microseconds
const MIN_DELAY_US: u32 = 100_000;

/// One discovered hwmon channel
struct Channel {
    input_path: PathBuf,
    kind: SensorKind,
}

/// Sensor backend reading `/sys/class/hwmon` directly
pub struct HwmonBackend {
    root: PathBuf,
    channels: Vec<Channel>,
}

impl HwmonBackend {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from(HWMON_ROOT))
    }

    /// Scan an alternate sysfs root. Used by tests.
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            channels: Vec::new(),
        }
    }

    fn scan(&mut self) -> Result<Vec<SensorDescriptor>> {
        let mut descriptors = Vec::new();
        self.channels.clear();

        let mut chip_dirs: Vec<PathBuf> = fs::read_dir(&self.root)
            .with_context(|| format!("reading {}", self.root.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        chip_dirs.sort();

        for chip_dir in chip_dirs {
            let chip = fs::read_to_string(chip_dir.join("name"))
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "hwmon".to_string());

            let mut stems: Vec<String> = fs::read_dir(&chip_dir)?
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| {
                    let file_name = entry.file_name().into_string().ok()?;
                    file_name.strip_suffix("_input").map(str::to_string)
                })
                .collect();
            stems.sort();

            for stem in stems {
                let (kind, _channel) = match parse_channel_stem(&stem) {
                    Some(parsed) => parsed,
                    None => continue,
                };
                let scale = scale_for(kind);

                let name = fs::read_to_string(chip_dir.join(format!("{}_label", stem)))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|_| format!("{} {}", chip, stem));

                let max_range = read_scaled(&chip_dir, &format!("{}_crit", stem), scale)
                    .or_else(|| read_scaled(&chip_dir, &format!("{}_max", stem), scale))
                    .unwrap_or_else(|| default_max(kind));

                let id = SensorId(descriptors.len() as u32);
                debug!("found {} channel {} on {}", kind.as_str(), stem, chip);
                descriptors.push(SensorDescriptor {
                    id,
                    name,
                    vendor: chip.clone(),
                    kind,
                    version: 1,
                    max_range,
                    resolution: scale,
                    power_ma: 0.0,
                    min_delay_us: MIN_DELAY_US,
                });
                self.channels.push(Channel {
                    input_path: chip_dir.join(format!("{}_input", stem)),
                    kind,
                });
            }
        }

        info!("hwmon scan complete: {} channels", descriptors.len());
        Ok(descriptors)
    }
}

impl Default for HwmonBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBackend for HwmonBackend {
    fn id(&self) -> &'static str {
        "hwmon"
    }

    fn name(&self) -> &'static str {
        "hwmon (sysfs)"
    }

    fn enumerate(&mut self) -> Result<Vec<SensorDescriptor>> {
        self.scan()
    }

    fn sample(&mut self, sensor: &SensorDescriptor) -> Result<Reading> {
        let channel = self
            .channels
            .get(sensor.id.0 as usize)
            .ok_or_else(|| anyhow!("unknown sensor {}", sensor.id))?;
        let value = read_raw(&channel.input_path)? * scale_for(channel.kind);
        Ok(Reading::now(sensor.id, vec![value], accuracy::HIGH))
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}

/// Split a channel stem like `temp1` into its kind and channel number
fn parse_channel_stem(stem: &str) -> Option<(SensorKind, u32)> {
    let digits_at = stem.find(|c: char| c.is_ascii_digit())?;
    let (prefix, number) = stem.split_at(digits_at);
    let channel: u32 = number.parse().ok()?;

    let kind = match prefix {
        "temp" => SensorKind::Temperature,
        "fan" => SensorKind::Fan,
        "in" => SensorKind::Voltage,
        "curr" => SensorKind::Current,
        "power" => SensorKind::Power,
        "humidity" => SensorKind::Humidity,
        _ => return None,
    };
    Some((kind, channel))
}

/// Factor turning a raw sysfs integer into the channel's display unit
///
/// hwmon reports temperatures in millidegrees, voltages in mV, currents
/// in mA, power in µW, humidity in m% and fan speed directly in RPM.
fn scale_for(kind: SensorKind) -> f32 {
    match kind {
        SensorKind::Temperature => 0.001,
        SensorKind::Fan => 1.0,
        SensorKind::Voltage => 0.001,
        SensorKind::Current => 0.001,
        SensorKind::Power => 0.000_001,
        SensorKind::Humidity => 0.001,
        SensorKind::Synthetic => 1.0,
    }
}

/// Reported range ceiling when the chip exposes no crit/max file
fn default_max(kind: SensorKind) -> f32 {
    match kind {
        SensorKind::Temperature => 150.0,
        SensorKind::Fan => 20_000.0,
        SensorKind::Voltage => 20.0,
        SensorKind::Current => 50.0,
        SensorKind::Power => 500.0,
        SensorKind::Humidity => 100.0,
        SensorKind::Synthetic => 100.0,
    }
}

fn read_raw(path: &Path) -> Result<f32> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    content
        .trim()
        .parse::<f32>()
        .with_context(|| format!("parsing {}", path.display()))
}

fn read_scaled(dir: &Path, file: &str, scale: f32) -> Option<f32> {
    let content = fs::read_to_string(dir.join(file)).ok()?;
    content.trim().parse::<f32>().ok().map(|raw| raw * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_channel_stem() {
        assert_eq!(
            parse_channel_stem("temp1"),
            Some((SensorKind::Temperature, 1))
        );
        assert_eq!(parse_channel_stem("fan2"), Some((SensorKind::Fan, 2)));
        assert_eq!(parse_channel_stem("in0"), Some((SensorKind::Voltage, 0)));
        assert_eq!(
            parse_channel_stem("curr3"),
            Some((SensorKind::Current, 3))
        );
        assert_eq!(parse_channel_stem("power1"), Some((SensorKind::Power, 1)));
        assert_eq!(
            parse_channel_stem("humidity1"),
            Some((SensorKind::Humidity, 1))
        );

        assert_eq!(parse_channel_stem("pwm1"), None);
        assert_eq!(parse_channel_stem("temp"), None);
        assert_eq!(parse_channel_stem("intrusion0"), None);
    }

    #[test]
    fn test_millidegrees_scale_to_celsius() {
        assert!((45_123.0 * scale_for(SensorKind::Temperature) - 45.123).abs() < 1e-4);
        assert_eq!(1200.0 * scale_for(SensorKind::Fan), 1200.0);
    }

    /// Build a throwaway hwmon-shaped tree under the system temp dir
    fn fake_hwmon(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "sens-probe-hwmon-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);

        let chip0 = root.join("hwmon0");
        fs::create_dir_all(&chip0).unwrap();
        fs::write(chip0.join("name"), "k10temp\n").unwrap();
        fs::write(chip0.join("temp1_input"), "45123\n").unwrap();
        fs::write(chip0.join("temp1_label"), "Tctl\n").unwrap();
        fs::write(chip0.join("temp1_crit"), "95000\n").unwrap();

        let chip1 = root.join("hwmon1");
        fs::create_dir_all(&chip1).unwrap();
        fs::write(chip1.join("name"), "nct6775\n").unwrap();
        fs::write(chip1.join("fan1_input"), "1200\n").unwrap();
        fs::write(chip1.join("pwm1"), "128\n").unwrap();

        root
    }

    #[test]
    fn test_scan_discovers_labeled_and_unlabeled_channels() {
        let root = fake_hwmon("scan");
        let mut backend = HwmonBackend::with_root(root.clone());

        let sensors = backend.enumerate().unwrap();
        assert_eq!(sensors.len(), 2);

        assert_eq!(sensors[0].name, "Tctl");
        assert_eq!(sensors[0].vendor, "k10temp");
        assert_eq!(sensors[0].kind, SensorKind::Temperature);
        assert!((sensors[0].max_range - 95.0).abs() < 1e-4);

        // No label file: falls back to "<chip> <stem>"
        assert_eq!(sensors[1].name, "nct6775 fan1");
        assert_eq!(sensors[1].kind, SensorKind::Fan);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_sample_reads_the_scaled_channel_value() {
        let root = fake_hwmon("sample");
        let mut backend = HwmonBackend::with_root(root.clone());

        let sensors = backend.enumerate().unwrap();
        let reading = backend.sample(&sensors[0]).unwrap();
        assert_eq!(reading.sensor, sensors[0].id);
        assert_eq!(reading.values.len(), 1);
        assert!((reading.values[0] - 45.123).abs() < 1e-4);

        let fan = backend.sample(&sensors[1]).unwrap();
        assert_eq!(fan.values, vec![1200.0]);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_sample_of_a_removed_channel_fails() {
        let root = fake_hwmon("removed");
        let mut backend = HwmonBackend::with_root(root.clone());

        let sensors = backend.enumerate().unwrap();
        fs::remove_file(root.join("hwmon0").join("temp1_input")).unwrap();
        assert!(backend.sample(&sensors[0]).is_err());

        let _ = fs::remove_dir_all(&root);
    }
}
