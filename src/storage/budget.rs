//! Budget plan repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetPlan, BudgetPlanId, PeriodType};
use crate::reports::source::BudgetPlanSource;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetPlanData {
    plans: Vec<BudgetPlan>,
}

/// Repository for budget plan persistence
pub struct BudgetPlanRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetPlanId, BudgetPlan>>,
}

impl BudgetPlanRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: BudgetPlanData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for plan in file_data.plans {
            data.insert(plan.id, plan);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), ExpenseError> {
        let plans = self.get_all()?;
        write_json_atomic(&self.path, &BudgetPlanData { plans })
    }

    /// All plans ordered month, bi-week, week
    pub fn get_all(&self) -> Result<Vec<BudgetPlan>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut plans: Vec<_> = data.values().cloned().collect();
        plans.sort_by_key(|p| p.interval_type);
        Ok(plans)
    }

    pub fn get_by_interval(&self, interval: PeriodType) -> Result<Option<BudgetPlan>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|p| p.interval_type == interval).cloned())
    }

    pub fn upsert(&self, plan: BudgetPlan) -> Result<(), ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(plan.id, plan);
        Ok(())
    }

    pub fn delete(&self, id: BudgetPlanId) -> Result<bool, ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }
}

impl BudgetPlanSource for BudgetPlanRepository {
    fn budget_plan(&self, interval: PeriodType) -> ExpenseResult<Option<BudgetPlan>> {
        self.get_by_interval(interval)
    }
}
