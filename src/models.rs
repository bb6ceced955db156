use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: String,
}

impl UserProfile {
    /// First word of the name, used for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_icon: Option<String>,
    #[serde(default)]
    pub category_color: Option<String>,
    pub date: String,
    #[serde(default)]
    pub user_id: String,
}

/// Body of a transaction create or update call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionPayload {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub progress: f64,
}

/// Body of a goal create or full update call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GoalPayload {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<String>,
}

/// Partial goal update used when adding money to a goal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GoalAmountUpdate {
    pub current_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryExpense {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_balance: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub transactions_count: u32,
    pub goals_count: u32,
    #[serde(default)]
    pub categories_by_expense: Vec<CategoryExpense>,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
    #[serde(default)]
    pub monthly_data: Vec<MonthlyTotals>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TipRequest {
    pub question: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TipResponse {
    pub tip: String,
    pub context: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_uses_type_on_the_wire() {
        let json = r##"{
            "id": "t1",
            "description": "Lunch",
            "amount": 25.5,
            "type": "expense",
            "category_id": "c1",
            "category_name": "Food",
            "date": "2025-01-05T12:00:00+00:00",
            "user_id": "u1"
        }"##;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category_name.as_deref(), Some("Food"));
        assert_eq!(transaction.category_color, None);
    }

    #[test]
    fn payload_omits_missing_date() {
        let payload = TransactionPayload {
            description: "Salary".into(),
            amount: 3000.0,
            kind: TransactionKind::Income,
            category_id: "c2".into(),
            date: None,
        };

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["type"], "income");
        assert!(json.get("date").is_none());
    }

    #[test]
    fn empty_tip_question_is_sent_as_null() {
        let json = serde_json::to_value(TipRequest { question: None }).unwrap();

        assert!(json["question"].is_null());
    }

    #[test]
    fn first_name_is_first_word() {
        let user = UserProfile {
            id: "u1".into(),
            name: "Maria  da Silva".into(),
            email: "maria@example.com".into(),
            created_at: String::new(),
        };

        assert_eq!(user.first_name(), "Maria");
    }
}
