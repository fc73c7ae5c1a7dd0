use serde::Serialize;
use std::fmt;

/// Why a scanner rejected a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    /// Archive member with an executable or script extension.
    EmbeddedExecutable,
    /// PDF object marker that can run script or launch an action.
    ScriptOrAction,
    /// Script, active content or macro flag inside an OOXML part.
    ScriptOrMacro,
    /// Compiled VBA storage inside an OOXML archive.
    Macro,
    /// Archive member inflates beyond the inspection budget.
    ExcessiveExpansion,
}

impl ThreatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatKind::EmbeddedExecutable => "embedded_executable",
            ThreatKind::ScriptOrAction => "script_or_action",
            ThreatKind::ScriptOrMacro => "script_or_macro",
            ThreatKind::Macro => "macro",
            ThreatKind::ExcessiveExpansion => "excessive_expansion",
        }
    }
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured rejection reason produced by a threat scanner.
///
/// `pattern` is the label of the rule that matched and `member` the archive
/// entry it matched in. Both are meant for audit logs only and never reach
/// the client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatFinding {
    pub kind: ThreatKind,
    pub pattern: Option<String>,
    pub member: Option<String>,
}

impl ThreatFinding {
    pub fn new(kind: ThreatKind) -> Self {
        Self {
            kind,
            pattern: None,
            member: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }
}

impl fmt::Display for ThreatFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(member) = &self.member {
            write!(f, " in {}", member)?;
        }
        if let Some(pattern) = &self.pattern {
            write!(f, " [{}]", pattern)?;
        }
        Ok(())
    }
}
