use crate::transaction::Kind;

const DEFAULT_EXPENSE_CATEGORIES: [&str; 7] = ["Food", "Transport", "Shopping", "Bills", "Entertainment", "Health", "Other Expense"];
const DEFAULT_INCOME_CATEGORIES: [&str; 5] = ["Salary", "Bonus", "Investment", "Gift", "Other Income"];

/// Category names compare without case, accented letters included
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Category names available for each transaction type, in display order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Categories {
    expense: Vec<String>,
    income: Vec<String>,
}

impl Default for Categories {
    fn default() -> Self {
        Categories {
            expense: DEFAULT_EXPENSE_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            income: DEFAULT_INCOME_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Categories {
    /// Build from user supplied lists. An empty list keeps the defaults for that type.
    pub(crate) fn new(expense: Vec<String>, income: Vec<String>) -> Categories {
        let mut categories = Categories::default();
        let clean = |names: Vec<String>| -> Vec<String> {
            let mut result: Vec<String> = vec![];
            for name in names {
                let name = name.trim();
                if !name.is_empty() && !result.iter().any(|n| same_name(n, name)) {
                    result.push(name.to_string());
                }
            }
            result
        };

        let expense = clean(expense);
        if !expense.is_empty() {
            categories.expense = expense;
        }
        let income = clean(income);
        if !income.is_empty() {
            categories.income = income;
        }
        categories
    }

    pub(crate) fn for_kind(&self, kind: Kind) -> &[String] {
        match kind {
            Kind::Expense => &self.expense,
            Kind::Income => &self.income,
        }
    }

    /// Expense categories followed by income categories
    pub(crate) fn all(&self) -> impl Iterator<Item = &String> {
        self.expense.iter().chain(self.income.iter())
    }

    /// Find the canonical spelling of `name` among the categories of `kind`.
    pub(crate) fn resolve(&self, kind: Kind, name: &str) -> Option<&str> {
        let name = name.trim();
        self.for_kind(kind).iter().find(|c| same_name(c, name)).map(|c| c.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let categories = Categories::default();
        assert_eq!(categories.for_kind(Kind::Expense).len(), 7);
        assert_eq!(categories.for_kind(Kind::Income)[0], "Salary");
        assert_eq!(categories.all().count(), 12);
    }

    #[test]
    fn test_resolve() {
        let categories = Categories::default();
        assert_eq!(categories.resolve(Kind::Expense, "food"), Some("Food"));
        assert_eq!(categories.resolve(Kind::Expense, " other expense "), Some("Other Expense"));
        assert_eq!(categories.resolve(Kind::Income, "food"), None);
        assert_eq!(categories.resolve(Kind::Income, "BONUS"), Some("Bonus"));
    }

    #[test]
    fn test_resolve_accented() {
        let categories = Categories::new(vec!["Épicerie".into(), "épicerie".into()], vec![]);
        assert_eq!(categories.for_kind(Kind::Expense), &["Épicerie".to_string()]);
        assert_eq!(categories.resolve(Kind::Expense, "ÉPICERIE"), Some("Épicerie"));
        assert_eq!(categories.resolve(Kind::Expense, "épicerie"), Some("Épicerie"));
    }

    #[test]
    fn test_override_keeps_defaults_for_empty_list() {
        let categories = Categories::new(vec!["Rent".into(), "rent".into(), " ".into()], vec![]);
        assert_eq!(categories.for_kind(Kind::Expense), &["Rent".to_string()]);
        assert_eq!(categories.for_kind(Kind::Income).len(), 5);
    }
}
