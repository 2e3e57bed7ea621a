//! Classify command

use anyhow::{Context, Result};
use exp_core::{LineageConfig, NodeClassifier, NodeId, PrefixClassifier};

/// One `<lsid>\t<kind>` line per identifier
pub fn execute(config: &LineageConfig, lsids: &[String]) -> Result<Vec<String>> {
    let classifier = PrefixClassifier::from_config(config);

    lsids
        .iter()
        .map(|raw| {
            let lsid = NodeId::new(raw.as_str()).context("Invalid identifier")?;
            let kind = classifier
                .classify(&lsid)
                .with_context(|| format!("Cannot classify {}", lsid))?;
            let marker = if kind.is_displayable() { "" } else { " (collapsed)" };
            Ok(format!("{}\t{}{}", lsid, kind, marker))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_namespaces() {
        let lines = execute(
            &LineageConfig::default(),
            &[
                "urn:lsid:labkey.com:Run.Folder-1:run-1".to_string(),
                "urn:lsid:labkey.com:Data.Folder-1:d1.txt".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(
            lines,
            vec![
                "urn:lsid:labkey.com:Run.Folder-1:run-1\trun (collapsed)".to_string(),
                "urn:lsid:labkey.com:Data.Folder-1:d1.txt\tdata".to_string(),
            ]
        );
    }

    #[test]
    fn test_blank_identifier_fails() {
        let blank = vec!["  ".to_string()];
        assert!(execute(&LineageConfig::default(), &blank).is_err());
    }
}
