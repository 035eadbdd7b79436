use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity level of a vulnerability as reported by the graph service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => anyhow::bail!("Unknown vulnerability severity '{}'", other),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Vulnerability details exposed in the stack report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub cvss: f32,
    #[serde(default)]
    pub cve_ids: Vec<String>,
    pub cvss_v3: String,
    #[serde(default)]
    pub cwes: Vec<String>,
    pub severity: Severity,
    pub title: String,
    pub url: String,
}

impl Vulnerability {
    /// Creates a vulnerability, rejecting a blank identifier or a CVSS score outside 0.0..=10.0
    pub fn new(id: String, cvss: f32, severity: Severity, title: String, url: String) -> Result<Self> {
        if id.trim().is_empty() {
            anyhow::bail!("Vulnerability ID cannot be empty");
        }

        if !(0.0..=10.0).contains(&cvss) {
            anyhow::bail!("CVSS score must be between 0.0 and 10.0, got {}", cvss);
        }

        Ok(Self {
            id,
            cvss,
            cve_ids: Vec::new(),
            cvss_v3: String::new(),
            cwes: Vec::new(),
            severity,
            title,
            url,
        })
    }

    pub fn with_cve_ids(mut self, cve_ids: Vec<String>) -> Self {
        self.cve_ids = cve_ids;
        self
    }

    pub fn with_cvss_v3(mut self, cvss_v3: String) -> Self {
        self.cvss_v3 = cvss_v3;
        self
    }

    pub fn with_cwes(mut self, cwes: Vec<String>) -> Self {
        self.cwes = cwes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("moderate".parse::<Severity>().unwrap(), Severity::Medium);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_vulnerability_new_valid() {
        let vuln = Vulnerability::new(
            "SNYK-PYTHON-FLASK-42185".to_string(),
            7.5,
            Severity::High,
            "Improper Input Validation".to_string(),
            "https://snyk.io/vuln/SNYK-PYTHON-FLASK-42185".to_string(),
        )
        .unwrap()
        .with_cve_ids(vec!["CVE-2018-1000656".to_string()])
        .with_cwes(vec!["CWE-20".to_string()]);

        assert_eq!(vuln.id, "SNYK-PYTHON-FLASK-42185");
        assert_eq!(vuln.cve_ids, vec!["CVE-2018-1000656"]);
        assert_eq!(vuln.cwes, vec!["CWE-20"]);
        assert!(vuln.cvss_v3.is_empty());
    }

    #[test]
    fn test_vulnerability_empty_id() {
        let result = Vulnerability::new(
            "  ".to_string(),
            5.0,
            Severity::Low,
            String::new(),
            String::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_vulnerability_cvss_out_of_range() {
        let result = Vulnerability::new(
            "SNYK-1".to_string(),
            11.0,
            Severity::Critical,
            String::new(),
            String::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_vulnerability_serializes_lowercase_severity() {
        let vuln = Vulnerability::new(
            "SNYK-1".to_string(),
            5.0,
            Severity::Medium,
            "title".to_string(),
            "url".to_string(),
        )
        .unwrap();
        let json = serde_json::to_value(&vuln).unwrap();
        assert_eq!(json["severity"], "medium");
    }
}
