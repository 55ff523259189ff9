//! Structured search expressions for `drug/event.json`.

/// A FAERS search expression built from named filter clauses joined with an
/// explicit `AND`, instead of ad-hoc string concatenation.
#[derive(Debug, Clone)]
pub(crate) struct EventQuery {
    clauses: Vec<String>,
}

impl EventQuery {
    /// Seeds the two filters every query in this crate carries: a fatal
    /// outcome (`seriousnessdeath`) and a physician as the report's primary
    /// source (`primarysource.qualification` code 1).
    pub(crate) fn fatal_physician_reported() -> Self {
        Self {
            clauses: vec![
                "seriousnessdeath:\"1\"".to_string(),
                "primarysource.qualification:\"1\"".to_string(),
            ],
        }
    }

    /// Requires `drug` among the report's generic drug names.
    pub(crate) fn generic_name(mut self, drug: &str) -> Self {
        self.clauses.push(format!(
            "patient.drug.openfda.generic_name:\"{}\"",
            escape_query_value(drug)
        ));
        self
    }

    /// Restricts to reports where the reporter characterized the drug's role
    /// as interacting (`drugcharacterization` code 3).
    pub(crate) fn interacting(mut self) -> Self {
        self.clauses
            .push("patient.drug.drugcharacterization:\"3\"".to_string());
        self
    }

    pub(crate) fn build(&self) -> String {
        self.clauses.join(" AND ")
    }
}

/// Escapes a user-provided value for openFDA's Lucene-like query syntax.
///
/// Conservative on purpose: all Lucene special characters are escaped so a
/// drug name containing quotes or operators cannot change query semantics.
pub(crate) fn escape_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '+' | '-' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~' | '*'
            | '?' | ':' | '/' | '&' | '|' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
