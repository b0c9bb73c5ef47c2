use std::{fs::File, io, path::Path};

use anyhow::Context;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Formats a duration as `m:ss.cc`.
pub fn format_duration(duration: std::time::Duration) -> String {
    format!(
        "{}:{:0>2}.{:0>2}",
        duration.as_secs() / 60,
        duration.as_secs() % 60,
        duration.subsec_millis() / 10
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0:00.00");
        assert_eq!(format_duration(Duration::from_millis(61_250)), "1:01.25");
        assert_eq!(format_duration(Duration::from_secs(3600)), "60:00.00");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_json_file::<serde_json::Value, _>("config", "/nonexistent/blockfall.json")
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open config file"), "{err}");
    }
}
