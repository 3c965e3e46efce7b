//! Required loan documents, grouped as on the application form.

use serde::Serialize;
use utoipa::ToSchema;

use crate::features::loans::models::LoanType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppliesTo {
    AllLoans,
    VehicleLoans,
    LandTitleLoans,
}

impl AppliesTo {
    fn matches(self, loan_type: LoanType) -> bool {
        match self {
            AppliesTo::AllLoans => true,
            AppliesTo::VehicleLoans => loan_type.is_vehicle(),
            AppliesTo::LandTitleLoans => loan_type == LoanType::LandTitle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChecklistItem {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug)]
struct Section {
    card_title: &'static str,
    applies_to: AppliesTo,
    items: &'static [ChecklistItem],
}

const fn item(key: &'static str, label: &'static str) -> ChecklistItem {
    ChecklistItem { key, label }
}

const SECTIONS: &[Section] = &[
    Section {
        card_title: "ข้อมูลผู้กู้ — 1. ข้อมูลส่วนตัว",
        applies_to: AppliesTo::AllLoans,
        items: &[
            item("id_card_borrower", "บัตรประชาชนผู้กู้"),
            item("house_reg_borrower", "ทะเบียนบ้านผู้กู้"),
            item(
                "marriage_cert_or_consent",
                "ทะเบียนสมรส / หนังสือยินยอมคู่สมรส (ถ้ามี)",
            ),
        ],
    },
    Section {
        card_title: "ข้อมูลผู้กู้สินเชื่อ — 2. ที่อยู่ปัจจุบัน",
        applies_to: AppliesTo::AllLoans,
        items: &[],
    },
    Section {
        card_title: "ข้อมูลผู้กู้สินเชื่อ — 3. ช่องทางการติดต่อ",
        applies_to: AppliesTo::AllLoans,
        items: &[],
    },
    Section {
        card_title: "ข้อมูลผู้กู้สินเชื่อ — 4. อาชีพและรายได้",
        applies_to: AppliesTo::AllLoans,
        items: &[
            item("statement_3_6_months", "Statement 3–6 เดือน"),
            item("income_docs", "เอกสารรายได้ (ถ้ามี)"),
        ],
    },
    Section {
        card_title: "ประเภทสินเชื่อ",
        applies_to: AppliesTo::AllLoans,
        items: &[],
    },
    Section {
        card_title: "ข้อมูลรถ",
        applies_to: AppliesTo::VehicleLoans,
        items: &[
            item("vehicle_book_original", "เล่มทะเบียนรถตัวจริง"),
            item("vehicle_book_copy", "สำเนาเล่มทะเบียนรถทุกหน้า"),
            item(
                "vehicle_photos",
                "รูปรถปัจจุบัน (หน้า-หลัง-ด้านข้าง-เลขไมล์)",
            ),
            item("chassis_photo", "รูปเลขตัวถัง (Chassis No.)"),
        ],
    },
    Section {
        card_title: "ข้อมูลโฉนดที่ดิน",
        applies_to: AppliesTo::LandTitleLoans,
        items: &[
            item("land_deed_ns3_original", "โฉนดที่ดินตัวจริง (น.ส.3 ก.)"),
            item("land_deed_original", "โฉนดที่ดินตัวจริง (น.ส.4 จ.)"),
            item("land_deed_copy", "สำเนาโฉนดทุกหน้า"),
            item("land_deed_registry_check", "ตรวจสารบัญจดทะเบียนด้านหลัง"),
            item("land_property_photos", "รูปถ่ายที่ดิน/บ้าน/อาคาร"),
        ],
    },
    Section {
        card_title: "ข้อมูลสินเชื่อ",
        applies_to: AppliesTo::AllLoans,
        items: &[item(
            "closing_balance_letter",
            "หนังสือยอดปิดบัญชีเดิม (กรณีรีไฟแนนซ์)",
        )],
    },
];

/// One form card and the documents attached under it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChecklistSection {
    pub card_title: &'static str,
    pub items: Vec<ChecklistItem>,
}

/// Non-empty sections that apply to `loan_type`, in form order
pub fn sections_for(loan_type: LoanType) -> Vec<ChecklistSection> {
    SECTIONS
        .iter()
        .filter(|s| !s.items.is_empty() && s.applies_to.matches(loan_type))
        .map(|s| ChecklistSection {
            card_title: s.card_title,
            items: s.items.to_vec(),
        })
        .collect()
}

/// Whether `key` is a document type collected for `loan_type`
pub fn accepts_document_type(loan_type: LoanType, key: &str) -> bool {
    SECTIONS
        .iter()
        .filter(|s| s.applies_to.matches(loan_type))
        .flat_map(|s| s.items.iter())
        .any(|i| i.key == key)
}

/// Display label for a document type key, across all loan types
pub fn document_label(key: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .flat_map(|s| s.items.iter())
        .find(|i| i.key == key)
        .map(|i| i.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(loan_type: LoanType) -> Vec<&'static str> {
        sections_for(loan_type)
            .iter()
            .flat_map(|s| s.items.iter().map(|i| i.key))
            .collect()
    }

    #[test]
    fn test_vehicle_loans_get_vehicle_documents() {
        for loan_type in [LoanType::PersonalCar, LoanType::CommercialVehicle] {
            let keys = keys(loan_type);
            assert!(keys.contains(&"vehicle_book_original"));
            assert!(keys.contains(&"chassis_photo"));
            assert!(!keys.contains(&"land_deed_copy"));
            assert!(keys.contains(&"id_card_borrower"));
            assert!(keys.contains(&"closing_balance_letter"));
        }
    }

    #[test]
    fn test_land_title_gets_deed_documents() {
        let keys = keys(LoanType::LandTitle);
        assert!(keys.contains(&"land_deed_ns3_original"));
        assert!(keys.contains(&"land_property_photos"));
        assert!(!keys.contains(&"vehicle_photos"));
        assert_eq!(keys.len(), 3 + 2 + 5 + 1);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let sections = sections_for(LoanType::PersonalCar);
        assert!(sections.iter().all(|s| !s.items.is_empty()));
        let titles: Vec<&str> = sections.iter().map(|s| s.card_title).collect();
        assert_eq!(
            titles,
            vec![
                "ข้อมูลผู้กู้ — 1. ข้อมูลส่วนตัว",
                "ข้อมูลผู้กู้สินเชื่อ — 4. อาชีพและรายได้",
                "ข้อมูลรถ",
                "ข้อมูลสินเชื่อ",
            ]
        );
    }

    #[test]
    fn test_accepts_document_type() {
        assert!(accepts_document_type(LoanType::LandTitle, "land_deed_copy"));
        assert!(!accepts_document_type(LoanType::LandTitle, "vehicle_book_copy"));
        assert!(!accepts_document_type(LoanType::PersonalCar, "unknown"));
    }

    #[test]
    fn test_document_label() {
        assert_eq!(document_label("id_card_borrower"), Some("บัตรประชาชนผู้กู้"));
        assert_eq!(document_label("nope"), None);
    }
}
