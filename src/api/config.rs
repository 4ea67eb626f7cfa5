// Metrics Server Configuration

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Prefix placed in front of `/metrics`
    pub base_path: String,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            base_path: String::new(),
        }
    }
}

impl MetricsServerConfig {
    /// Route of the scrape endpoint, always rooted at `/`
    pub fn metrics_path(&self) -> String {
        let base = self.base_path.trim_matches('/');
        if base.is_empty() {
            "/metrics".to_string()
        } else {
            format!("/{}/metrics", base)
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_base(base: &str) -> MetricsServerConfig {
        MetricsServerConfig {
            base_path: base.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_metrics_path() {
        assert_eq!(with_base("").metrics_path(), "/metrics");
        assert_eq!(with_base("/").metrics_path(), "/metrics");
        assert_eq!(with_base("/checker").metrics_path(), "/checker/metrics");
        assert_eq!(with_base("checker/").metrics_path(), "/checker/metrics");
        assert_eq!(with_base("/a/b").metrics_path(), "/a/b/metrics");
    }

    #[test]
    fn test_bind_address() {
        let config = MetricsServerConfig {
            port: 18000,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:18000");
    }
}
