//! Capability detection: tags files with behaviours such as `network` or
//! `database` based on what they import and which calls appear in them.

use archgate_core::utils::package_matches;
use archgate_core::{CapabilityDef, DetectedCapability};

struct BuiltinCapability {
    name: &'static str,
    imports: &'static [&'static str],
    calls: &'static [&'static str],
}

/// Used when the config has no `capabilities` section.
static BUILTIN_CAPABILITIES: &[BuiltinCapability] = &[
    BuiltinCapability {
        name: "network",
        imports: &[
            "http",
            "https",
            "http2",
            "net",
            "axios",
            "node-fetch",
            "got",
            "undici",
            "requests",
            "httpx",
            "urllib",
            "urllib3",
            "aiohttp",
            "socket",
            "java.net",
            "okhttp3",
            "retrofit2",
            "io.ktor.client",
        ],
        calls: &["fetch(", "new XMLHttpRequest", "new WebSocket("],
    },
    BuiltinCapability {
        name: "filesystem",
        imports: &[
            "fs",
            "fs-extra",
            "shutil",
            "pathlib",
            "java.io.File",
            "java.nio.file",
            "kotlin.io",
        ],
        calls: &["readFileSync(", "writeFileSync(", "Files.readAllBytes(", "Files.write("],
    },
    BuiltinCapability {
        name: "database",
        imports: &[
            "pg",
            "mysql",
            "mysql2",
            "sqlite3",
            "better-sqlite3",
            "mongodb",
            "mongoose",
            "typeorm",
            "@prisma/client",
            "sequelize",
            "knex",
            "redis",
            "ioredis",
            "sqlalchemy",
            "psycopg2",
            "pymongo",
            "django.db",
            "java.sql",
            "javax.persistence",
            "jakarta.persistence",
            "org.hibernate",
            "org.springframework.data",
            "org.jetbrains.exposed",
        ],
        calls: &[],
    },
    BuiltinCapability {
        name: "process",
        imports: &["child_process", "worker_threads", "subprocess", "multiprocessing"],
        calls: &[
            "process.exit(",
            "os.system(",
            "Runtime.getRuntime().exec(",
            "ProcessBuilder(",
        ],
    },
    BuiltinCapability {
        name: "messaging",
        imports: &[
            "amqplib",
            "kafkajs",
            "nats",
            "bullmq",
            "@aws-sdk/client-sqs",
            "@aws-sdk/client-sns",
            "pika",
            "kafka",
            "confluent_kafka",
            "celery",
            "org.apache.kafka",
            "com.rabbitmq",
            "javax.jms",
            "jakarta.jms",
        ],
        calls: &[],
    },
];

/// The built-in capability table as config definitions.
#[must_use]
pub fn builtin_capabilities() -> Vec<CapabilityDef> {
    BUILTIN_CAPABILITIES
        .iter()
        .map(|c| CapabilityDef {
            name: c.name.to_owned(),
            imports: c.imports.iter().map(|s| (*s).to_owned()).collect(),
            calls: c.calls.iter().map(|s| (*s).to_owned()).collect(),
        })
        .collect()
}

/// Matches imports and source lines against capability definitions.
#[derive(Debug, Clone, Default)]
pub struct CapabilityDetector {
    defs: Vec<CapabilityDef>,
}

impl CapabilityDetector {
    /// Creates a detector from the configured list.
    ///
    /// `None` selects the built-in table; `Some(vec![])` disables detection.
    #[must_use]
    pub fn new(configured: Option<&[CapabilityDef]>) -> Self {
        Self {
            defs: configured.map_or_else(builtin_capabilities, <[CapabilityDef]>::to_vec),
        }
    }

    /// True if no capabilities are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Capabilities triggered by one import specifier.
    pub fn detect_import(&self, specifier: &str, line: usize) -> Vec<DetectedCapability> {
        let bare = specifier.strip_prefix("node:").unwrap_or(specifier);
        self.defs
            .iter()
            .filter(|def| {
                def.imports
                    .iter()
                    .any(|p| package_matches(specifier, p) || package_matches(bare, p))
            })
            .map(|def| DetectedCapability {
                name: def.name.clone(),
                line: Some(line),
                evidence: specifier.to_owned(),
            })
            .collect()
    }

    /// Capabilities triggered by call tokens, at most one per capability per line.
    pub fn detect_calls(&self, source: &str) -> Vec<DetectedCapability> {
        if self.defs.iter().all(|d| d.calls.is_empty()) {
            return Vec::new();
        }
        let mut found = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            for def in &self.defs {
                if let Some(token) = def.calls.iter().find(|t| line.contains(t.as_str())) {
                    found.push(DetectedCapability {
                        name: def.name.clone(),
                        line: Some(idx + 1),
                        evidence: token.clone(),
                    });
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_categories() {
        let names: Vec<String> = builtin_capabilities().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["network", "filesystem", "database", "process", "messaging"]
        );
    }

    #[test]
    fn detects_imports_with_builtin_table() {
        let d = CapabilityDetector::new(None);
        let hits = d.detect_import("axios", 4);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "network");
        assert_eq!(hits[0].line, Some(4));

        assert_eq!(d.detect_import("node:fs/promises", 1)[0].name, "filesystem");
        assert_eq!(d.detect_import("java.sql.Connection", 1)[0].name, "database");
        assert!(d.detect_import("lodash", 1).is_empty());
        assert!(d.detect_import("fsevents", 1).is_empty());
    }

    #[test]
    fn detects_call_tokens_per_line() {
        let d = CapabilityDetector::new(None);
        let src = "const a = 1;\nconst r = await fetch(url); fetch(other);\nprocess.exit(1);\n";
        let hits = d.detect_calls(src);
        let got: Vec<(&str, Option<usize>)> =
            hits.iter().map(|h| (h.name.as_str(), h.line)).collect();
        assert_eq!(got, vec![("network", Some(2)), ("process", Some(3))]);
    }

    #[test]
    fn explicit_empty_list_disables_detection() {
        let d = CapabilityDetector::new(Some(&[]));
        assert!(d.is_empty());
        assert!(d.detect_import("axios", 1).is_empty());
        assert!(d.detect_calls("fetch(x)").is_empty());
    }

    #[test]
    fn custom_definitions_replace_builtins() {
        let defs = vec![CapabilityDef {
            name: "payments".into(),
            imports: vec!["stripe".into()],
            calls: vec!["charge(".into()],
        }];
        let d = CapabilityDetector::new(Some(&defs));
        assert_eq!(d.detect_import("stripe", 2)[0].name, "payments");
        assert!(d.detect_import("axios", 2).is_empty());
        assert_eq!(d.detect_calls("x.charge(10)")[0].line, Some(1));
    }
}
