//! Transaction categories
//!
//! The category set is closed. Income is the only non-expense category, so it
//! is modelled separately from the nine expense categories and can never show
//! up in an expense-side iteration. [`ExpenseMap`] keys a value by every
//! expense category, which makes lookups infallible.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A spending category, declared in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpenseCategory {
    Housing,
    Automobile,
    Medical,
    Subscription,
    Grocery,
    Dining,
    Shopping,
    Gas,
    Others,
}

impl ExpenseCategory {
    pub const COUNT: usize = 9;

    /// All expense categories in reporting order
    pub const ALL: [ExpenseCategory; Self::COUNT] = [
        Self::Housing,
        Self::Automobile,
        Self::Medical,
        Self::Subscription,
        Self::Grocery,
        Self::Dining,
        Self::Shopping,
        Self::Gas,
        Self::Others,
    ];

    /// Stable identifier used in storage and JSON output
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Automobile => "Automobile",
            Self::Medical => "Medical",
            Self::Subscription => "Subscription",
            Self::Grocery => "Grocery",
            Self::Dining => "Dining",
            Self::Shopping => "Shopping",
            Self::Gas => "Gas",
            Self::Others => "Others",
        }
    }

    /// Human-facing label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Housing => "HOUSING",
            Self::Automobile => "AUTO",
            Self::Medical => "MEDICAL",
            Self::Subscription => "SUBSCRIPTION",
            Self::Grocery => "GROCERY",
            Self::Dining => "FOOD & DRINK",
            Self::Shopping => "SHOPPING",
            Self::Gas => "GAS",
            Self::Others => "OTHERS",
        }
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExpenseCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Category>()? {
            Category::Expense(category) => Ok(category),
            Category::Income => Err(CategoryParseError::NotAnExpense),
        }
    }
}

/// Any transaction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Income,
    Expense(ExpenseCategory),
}

impl Category {
    /// Every category, Income first, then expenses in reporting order
    pub const ALL: [Category; ExpenseCategory::COUNT + 1] = [
        Category::Income,
        Category::Expense(ExpenseCategory::Housing),
        Category::Expense(ExpenseCategory::Automobile),
        Category::Expense(ExpenseCategory::Medical),
        Category::Expense(ExpenseCategory::Subscription),
        Category::Expense(ExpenseCategory::Grocery),
        Category::Expense(ExpenseCategory::Dining),
        Category::Expense(ExpenseCategory::Shopping),
        Category::Expense(ExpenseCategory::Gas),
        Category::Expense(ExpenseCategory::Others),
    ];

    pub const fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    /// The expense category, or `None` for Income
    pub const fn expense(&self) -> Option<ExpenseCategory> {
        match self {
            Self::Income => None,
            Self::Expense(category) => Some(*category),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense(category) => category.name(),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense(category) => category.label(),
        }
    }
}

impl From<ExpenseCategory> for Category {
    fn from(category: ExpenseCategory) -> Self {
        Self::Expense(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    /// Accepts the name or the label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CategoryParseError::Unknown(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ExpenseCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ExpenseCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for category parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryParseError {
    Unknown(String),
    NotAnExpense,
}

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(s) => write!(f, "Unknown category: '{}'", s),
            Self::NotAnExpense => write!(f, "Income is not an expense category"),
        }
    }
}

impl std::error::Error for CategoryParseError {}

/// A value for every expense category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseMap<T>([T; ExpenseCategory::COUNT]);

impl<T> ExpenseMap<T> {
    /// Build a map by evaluating `f` for each category in order
    pub fn from_fn(mut f: impl FnMut(ExpenseCategory) -> T) -> Self {
        Self(ExpenseCategory::ALL.map(|c| f(c)))
    }

    /// Entries in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, &T)> + '_ {
        ExpenseCategory::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    /// Apply `f` to every value
    pub fn map<U>(&self, mut f: impl FnMut(ExpenseCategory, &T) -> U) -> ExpenseMap<U> {
        ExpenseMap::from_fn(|c| f(c, &self[c]))
    }
}

impl<T: Default> Default for ExpenseMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<ExpenseCategory> for ExpenseMap<T> {
    type Output = T;

    fn index(&self, category: ExpenseCategory) -> &T {
        &self.0[category.index()]
    }
}

impl<T> IndexMut<ExpenseCategory> for ExpenseMap<T> {
    fn index_mut(&mut self, category: ExpenseCategory) -> &mut T {
        &mut self.0[category.index()]
    }
}

impl<T: Serialize> Serialize for ExpenseMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ExpenseCategory::COUNT))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.name(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_label() {
        assert_eq!(
            "grocery".parse::<Category>().unwrap(),
            Category::from(ExpenseCategory::Grocery)
        );
        assert_eq!(
            "FOOD & DRINK".parse::<Category>().unwrap(),
            Category::Expense(ExpenseCategory::Dining)
        );
        assert_eq!(
            "auto".parse::<Category>().unwrap(),
            Category::from(ExpenseCategory::Automobile)
        );
        assert_eq!("INCOME".parse::<Category>().unwrap(), Category::Income);
        assert!("rent".parse::<Category>().is_err());
    }

    #[test]
    fn test_income_is_not_an_expense_category() {
        assert_eq!(
            "Income".parse::<ExpenseCategory>(),
            Err(CategoryParseError::NotAnExpense)
        );
        assert!(Category::Income.expense().is_none());
    }

    #[test]
    fn test_order() {
        assert_eq!(Category::ALL[0], Category::Income);
        assert_eq!(ExpenseCategory::ALL[ExpenseCategory::COUNT - 1], ExpenseCategory::Others);
        assert!(ExpenseCategory::Housing < ExpenseCategory::Others);
        for (i, c) in ExpenseCategory::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Category::ALL[i + 1], Category::Expense(*c));
        }
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&Category::Expense(ExpenseCategory::Gas)).unwrap();
        assert_eq!(json, "\"Gas\"");
        let back: Category = serde_json::from_str("\"Income\"").unwrap();
        assert_eq!(back, Category::Income);
    }

    #[test]
    fn test_expense_map_index_and_serialize() {
        let mut map: ExpenseMap<f64> = ExpenseMap::default();
        map[ExpenseCategory::Dining] += 12.5;
        assert_eq!(map[ExpenseCategory::Dining], 12.5);
        assert_eq!(map.values().sum::<f64>(), 12.5);

        let json = serde_json::to_value(map).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 9);
        assert_eq!(obj["Dining"], 12.5);
        assert_eq!(obj["Housing"], 0.0);
    }
}
