//! OOXML container scanner.

use std::io::{Cursor, Read};

use docsentry_core::{IngestConfig, ThreatFinding, ThreatKind};
use zip::ZipArchive;

use super::patterns::{
    first_xml_match, is_denied_member, is_macro_member, INSPECTED_XML_MEMBERS,
};
use super::{ScanError, ThreatScanner};

/// Decompression limits applied while inspecting archive members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    pub max_member_bytes: usize,
    pub max_inspected_bytes: usize,
}

impl ScanLimits {
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            max_member_bytes: config.max_member_bytes,
            max_inspected_bytes: config.max_inspected_bytes,
        }
    }
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self::from_config(&IngestConfig::default())
    }
}

/// Outcome of a bounded member read.
#[derive(Debug)]
pub(crate) enum MemberRead {
    Data(Vec<u8>),
    /// Declared or actual uncompressed size exceeds the limit
    TooLarge,
    /// Member missing or its data could not be read
    Unreadable(String),
}

/// Read one member through a `take` limit, never trusting the declared size
/// alone.
pub(crate) fn read_member_bounded<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    limit: usize,
) -> MemberRead {
    let file = match archive.by_name(name) {
        Ok(file) => file,
        Err(e) => return MemberRead::Unreadable(e.to_string()),
    };

    if file.size() > limit as u64 {
        return MemberRead::TooLarge;
    }

    let mut data = Vec::new();
    match file.take(limit as u64 + 1).read_to_end(&mut data) {
        Ok(_) if data.len() > limit => MemberRead::TooLarge,
        Ok(_) => MemberRead::Data(data),
        Err(e) => MemberRead::Unreadable(e.to_string()),
    }
}

/// Scanner for zip-based Word documents.
///
/// Rules run in a fixed order and the first one that fires wins:
/// executable member names, active content in the inspected XML parts, then
/// macro storage names. Name rules only use the central directory.
#[derive(Debug, Clone, Default)]
pub struct ContainerThreatScanner {
    limits: ScanLimits,
}

impl ContainerThreatScanner {
    pub fn new(limits: ScanLimits) -> Self {
        Self { limits }
    }

    fn inspect_xml_members<R: Read + std::io::Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        names: &[String],
    ) -> Result<(), ScanError> {
        let mut inspected = 0usize;

        for member in INSPECTED_XML_MEMBERS {
            if !names.iter().any(|n| n == member) {
                continue;
            }

            let budget = self.limits.max_inspected_bytes.saturating_sub(inspected);
            let limit = self.limits.max_member_bytes.min(budget);

            let data = match read_member_bounded(archive, member, limit) {
                MemberRead::Data(data) => data,
                MemberRead::TooLarge => {
                    return Err(ThreatFinding::new(ThreatKind::ExcessiveExpansion)
                        .with_member(*member)
                        .into());
                }
                MemberRead::Unreadable(reason) => {
                    tracing::warn!(
                        member = %member,
                        error = %reason,
                        "Skipping unreadable archive member"
                    );
                    continue;
                }
            };
            inspected += data.len();

            let text = String::from_utf8_lossy(&data);
            if let Some(label) = first_xml_match(&text) {
                return Err(ThreatFinding::new(ThreatKind::ScriptOrMacro)
                    .with_member(*member)
                    .with_pattern(label)
                    .into());
            }
        }

        Ok(())
    }
}

impl ThreatScanner for ContainerThreatScanner {
    fn name(&self) -> &'static str {
        "container"
    }

    fn scan(&self, content: &[u8]) -> Result<(), ScanError> {
        let mut archive = ZipArchive::new(Cursor::new(content))
            .map_err(|e| ScanError::CorruptContainer(e.to_string()))?;

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        if let Some(member) = names.iter().find(|n| is_denied_member(n)) {
            return Err(ThreatFinding::new(ThreatKind::EmbeddedExecutable)
                .with_member(member.as_str())
                .into());
        }

        self.inspect_xml_members(&mut archive, &names)?;

        if let Some(member) = names.iter().find(|n| is_macro_member(n)) {
            return Err(ThreatFinding::new(ThreatKind::Macro)
                .with_member(member.as_str())
                .into());
        }

        Ok(())
    }
}
