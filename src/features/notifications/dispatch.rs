//! Who gets an SMS for each workflow event, and what it says.

use serde::{Deserialize, Serialize};

/// Fallback label when a loan has neither reference nor customer name
const UNNAMED_LOAN_LABEL: &str = "เคสสินเชื่อ";

/// Workflow events that trigger an SMS, numbered as the `/api/notify` contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Scenario {
    /// Salesperson submitted a new case
    NewSubmission,
    /// Approver returned the case for revision
    ReturnedForRevision,
    /// Owner edited and resubmitted
    Resubmitted,
    Approved,
    Rejected,
}

impl TryFrom<u8> for Scenario {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Scenario::NewSubmission),
            2 => Ok(Scenario::ReturnedForRevision),
            3 => Ok(Scenario::Resubmitted),
            4 => Ok(Scenario::Approved),
            5 => Ok(Scenario::Rejected),
            other => Err(format!("scenario must be 1-5, got {}", other)),
        }
    }
}

impl From<Scenario> for u8 {
    fn from(scenario: Scenario) -> Self {
        match scenario {
            Scenario::NewSubmission => 1,
            Scenario::ReturnedForRevision => 2,
            Scenario::Resubmitted => 3,
            Scenario::Approved => 4,
            Scenario::Rejected => 5,
        }
    }
}

/// Recipient selection for a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipients {
    AllApprovers,
    Owner,
    /// The approver assigned to the loan, or every approver when none has a phone
    AssignedApproverOrAll,
}

impl Scenario {
    pub fn recipients(self) -> Recipients {
        match self {
            Scenario::NewSubmission => Recipients::AllApprovers,
            Scenario::Resubmitted => Recipients::AssignedApproverOrAll,
            Scenario::ReturnedForRevision | Scenario::Approved | Scenario::Rejected => {
                Recipients::Owner
            }
        }
    }

    pub fn message(self, label: &str) -> String {
        match self {
            Scenario::NewSubmission => format!("[NTJ] มีเคสสินเชื่อใหม่รอตรวจสอบ: {}", label),
            Scenario::ReturnedForRevision => {
                format!("[NTJ] เคส {} ถูกส่งกลับไปแก้ไข กรุณาแก้ไขและส่งกลับ", label)
            }
            Scenario::Resubmitted => format!("[NTJ] เคส {} ถูกแก้ไขแล้ว รอตรวจสอบ", label),
            Scenario::Approved => format!("[NTJ] เคส {} อนุมัติแล้ว", label),
            Scenario::Rejected => format!("[NTJ] เคส {} ถูกปฏิเสธ", label),
        }
    }
}

/// Human label for a loan in SMS text: "ref (customer)", either part alone, or a generic fallback
pub fn loan_label(reference: Option<&str>, customer_name: Option<&str>) -> String {
    let reference = reference.map(str::trim).filter(|s| !s.is_empty());
    let customer_name = customer_name.map(str::trim).filter(|s| !s.is_empty());

    match (reference, customer_name) {
        (Some(r), Some(n)) => format!("{} ({})", r, n),
        (Some(r), None) => r.to_string(),
        (None, Some(n)) => n.to_string(),
        (None, None) => UNNAMED_LOAN_LABEL.to_string(),
    }
}

/// Drop blank phones and trim the rest
pub fn usable_phones<I, S>(phones: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phones
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_numbers() {
        for n in 1..=5u8 {
            let scenario = Scenario::try_from(n).unwrap();
            assert_eq!(u8::from(scenario), n);
        }
        assert!(Scenario::try_from(0).is_err());
        assert!(Scenario::try_from(6).is_err());
    }

    #[test]
    fn test_scenario_deserializes_from_number() {
        let scenario: Scenario = serde_json::from_str("4").unwrap();
        assert_eq!(scenario, Scenario::Approved);
        assert!(serde_json::from_str::<Scenario>("9").is_err());
    }

    #[test]
    fn test_recipients_per_scenario() {
        assert_eq!(Scenario::NewSubmission.recipients(), Recipients::AllApprovers);
        assert_eq!(Scenario::ReturnedForRevision.recipients(), Recipients::Owner);
        assert_eq!(
            Scenario::Resubmitted.recipients(),
            Recipients::AssignedApproverOrAll
        );
        assert_eq!(Scenario::Approved.recipients(), Recipients::Owner);
        assert_eq!(Scenario::Rejected.recipients(), Recipients::Owner);
    }

    #[test]
    fn test_loan_label_variants() {
        assert_eq!(
            loan_label(Some("R6701150007"), Some("สมหญิง")),
            "R6701150007 (สมหญิง)"
        );
        assert_eq!(loan_label(Some("R6701150007"), None), "R6701150007");
        assert_eq!(loan_label(Some("  "), Some("สมหญิง")), "สมหญิง");
        assert_eq!(loan_label(None, None), "เคสสินเชื่อ");
    }

    #[test]
    fn test_messages() {
        let label = "R6701150007 (สมหญิง)";
        assert_eq!(
            Scenario::NewSubmission.message(label),
            "[NTJ] มีเคสสินเชื่อใหม่รอตรวจสอบ: R6701150007 (สมหญิง)"
        );
        assert_eq!(
            Scenario::ReturnedForRevision.message(label),
            "[NTJ] เคส R6701150007 (สมหญิง) ถูกส่งกลับไปแก้ไข กรุณาแก้ไขและส่งกลับ"
        );
        assert_eq!(
            Scenario::Resubmitted.message(label),
            "[NTJ] เคส R6701150007 (สมหญิง) ถูกแก้ไขแล้ว รอตรวจสอบ"
        );
        assert_eq!(
            Scenario::Approved.message(label),
            "[NTJ] เคส R6701150007 (สมหญิง) อนุมัติแล้ว"
        );
        assert_eq!(
            Scenario::Rejected.message(label),
            "[NTJ] เคส R6701150007 (สมหญิง) ถูกปฏิเสธ"
        );
    }

    #[test]
    fn test_usable_phones() {
        let phones = usable_phones(vec![" 0812345678 ", "", "   ", "0898765432"]);
        assert_eq!(phones, vec!["0812345678", "0898765432"]);
    }
}
