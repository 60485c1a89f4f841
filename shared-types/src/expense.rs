use serde::{Deserialize, Serialize};

/// Fixed set of expense categories offered to the user.
///
/// The order is significant: the category keyboard addresses entries by
/// index, so callback payloads carry a position into [`ExpenseCategory::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseCategory {
    ProfessionalMeals,
    FuelTravel,
    MedicalEquipment,
    Supplies,
    Training,
    PhoneInternet,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::ProfessionalMeals,
        ExpenseCategory::FuelTravel,
        ExpenseCategory::MedicalEquipment,
        ExpenseCategory::Supplies,
        ExpenseCategory::Training,
        ExpenseCategory::PhoneInternet,
        ExpenseCategory::Other,
    ];

    /// Display label shown to the user (and in exports).
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::ProfessionalMeals => "Repas professionnels",
            ExpenseCategory::FuelTravel => "Carburant/Déplacements",
            ExpenseCategory::MedicalEquipment => "Matériel médical",
            ExpenseCategory::Supplies => "Fournitures",
            ExpenseCategory::Training => "Formations",
            ExpenseCategory::PhoneInternet => "Téléphone/Internet",
            ExpenseCategory::Other => "Autres",
        }
    }

    /// Resolves a keyboard index back to a category.
    pub fn from_index(index: usize) -> Option<ExpenseCategory> {
        ExpenseCategory::ALL.get(index).copied()
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique id counted over every expense ever created; never reassigned
    /// after a deletion, so the set of live ids need not be contiguous.
    pub id: i64,
    /// `DD/MM/YYYY`.
    pub date: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    /// Unix timestamp of the commit.
    pub created_at: i64,
}
