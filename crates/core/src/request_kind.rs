//! Kinds of formal requests (requerimentos) filed against a claim.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What a request asks the court for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Priority on grounds of serious illness.
    PriorityIllness,
    /// Priority on grounds of age.
    PriorityAge,
    /// Settlement on the principal amount.
    AgreementPrincipal,
    /// Settlement on contractual fees.
    AgreementContractualFees,
    /// Settlement on succumbence fees.
    AgreementSuccumbenceFees,
}

impl RequestKind {
    pub const ALL: [RequestKind; 5] = [
        RequestKind::PriorityIllness,
        RequestKind::PriorityAge,
        RequestKind::AgreementPrincipal,
        RequestKind::AgreementContractualFees,
        RequestKind::AgreementSuccumbenceFees,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::PriorityIllness => "priority_illness",
            RequestKind::PriorityAge => "priority_age",
            RequestKind::AgreementPrincipal => "agreement_principal",
            RequestKind::AgreementContractualFees => "agreement_contractual_fees",
            RequestKind::AgreementSuccumbenceFees => "agreement_succumbence_fees",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == value)
            .ok_or_else(|| CoreError::Validation(format!("Invalid request kind '{value}'")))
    }

    /// Short label for list views.
    pub fn short_label(self) -> &'static str {
        match self {
            RequestKind::PriorityIllness => "Priority Illness",
            RequestKind::PriorityAge => "Priority Age",
            RequestKind::AgreementPrincipal => "Agreement Principal",
            RequestKind::AgreementContractualFees => "Agreement Contr. Fees",
            RequestKind::AgreementSuccumbenceFees => "Agreement Succ. Fees",
        }
    }

    /// Whether the request asks for procedural priority.
    pub fn is_priority(self) -> bool {
        matches!(self, RequestKind::PriorityIllness | RequestKind::PriorityAge)
    }

    /// Database values of the priority kinds.
    pub fn priority_values() -> Vec<&'static str> {
        Self::ALL
            .into_iter()
            .filter(|k| k.is_priority())
            .map(RequestKind::as_str)
            .collect()
    }
}
