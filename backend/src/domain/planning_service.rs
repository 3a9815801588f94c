//! Planning service: definition management, monthly recording and aggregation.
//!
//! Every read loads a fresh snapshot from storage into a [`PlanningCatalog`]
//! and a [`MonthlyOverrideStore`], then hands it to the [`AggregationEngine`].
//! Writes go through one async lock so read-modify-write cycles of
//! concurrent requests cannot interleave.

use chrono::Utc;
use log::{info, warn};
use shared::PlanType;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::OverrideRetention;
use crate::domain::aggregation::{AggregationEngine, MonthlySummary, MonthlyTotals, YearOverview};
use crate::domain::commands::{
    CreateDefinitionCommand, DefinitionResult, DeleteDefinitionResult, OverrideResult,
    RecordMonthValueCommand, SetMonthPaidCommand, SetPaidCommand, UpdateDefinitionCommand,
};
use crate::domain::errors::{PlanningError, PlanningResult};
use crate::domain::formula::FormulaEvaluator;
use crate::domain::models::{
    MonthKey, MonthlyOverride, PlanningDefinition, MAX_CATEGORY_NAME_LENGTH,
};
use crate::domain::override_store::MonthlyOverrideStore;
use crate::domain::planning_catalog::PlanningCatalog;
use crate::storage::traits::{Connection, OverrideStorage, PlanningStorage};

#[derive(Clone)]
pub struct PlanningService<C: Connection> {
    planning_repository: C::PlanningRepository,
    override_repository: C::OverrideRepository,
    evaluator: FormulaEvaluator,
    retention: OverrideRetention,
    write_lock: Arc<Mutex<()>>,
}

impl<C: Connection> PlanningService<C> {
    pub fn new(connection: &C, retention: OverrideRetention) -> Self {
        Self {
            planning_repository: connection.create_planning_repository(),
            override_repository: connection.create_override_repository(),
            evaluator: FormulaEvaluator::new(),
            retention,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create_definition(
        &self,
        command: CreateDefinitionCommand,
    ) -> PlanningResult<DefinitionResult> {
        info!(
            "Creating planning definition: type={}, category={}",
            command.plan_type, command.category_name
        );
        let (category_name, formula) =
            self.validate_fields(&command.category_name, command.formula.as_deref(), command.base_value)?;

        let _guard = self.write_lock.lock().await;
        let now = Utc::now();
        let definition = PlanningDefinition {
            id: PlanningDefinition::generate_id(),
            plan_type: command.plan_type,
            category_name,
            formula,
            base_value: command.base_value,
            end_month: command.end_month,
            created_at: now,
            updated_at: now,
        };
        self.planning_repository.store_definition(&definition).await?;

        info!("Created planning definition {} ({})", definition.id, definition.category_name);
        Ok(DefinitionResult { definition })
    }

    pub async fn update_definition(
        &self,
        command: UpdateDefinitionCommand,
    ) -> PlanningResult<DefinitionResult> {
        info!("Updating planning definition: {}", command.planning_id);
        let (category_name, formula) =
            self.validate_fields(&command.category_name, command.formula.as_deref(), command.base_value)?;

        let _guard = self.write_lock.lock().await;
        let mut definition = self.require_definition(&command.planning_id).await?;
        definition.plan_type = command.plan_type;
        definition.category_name = category_name;
        definition.formula = formula;
        definition.base_value = command.base_value;
        definition.end_month = command.end_month;
        definition.updated_at = Utc::now();
        self.planning_repository.update_definition(&definition).await?;

        info!("Updated planning definition {}", definition.id);
        Ok(DefinitionResult { definition })
    }

    /// Delete a definition; its overrides are removed only under
    /// [`OverrideRetention::Cascade`].
    pub async fn delete_definition(&self, planning_id: &str) -> PlanningResult<DeleteDefinitionResult> {
        info!("Deleting planning definition: {} (retention={})", planning_id, self.retention);

        let _guard = self.write_lock.lock().await;
        let deleted = self.require_definition(planning_id).await?;
        self.planning_repository.delete_definition(planning_id).await?;

        let removed_overrides = match self.retention {
            OverrideRetention::Cascade => {
                self.override_repository
                    .delete_overrides_for_definition(planning_id)
                    .await?
            }
            OverrideRetention::Retain => 0,
        };

        info!(
            "Deleted planning definition {} ({} overrides removed)",
            planning_id, removed_overrides
        );
        Ok(DeleteDefinitionResult {
            deleted,
            removed_overrides,
        })
    }

    pub async fn get_definition(&self, planning_id: &str) -> PlanningResult<PlanningDefinition> {
        info!("Getting planning definition: {}", planning_id);
        self.require_definition(planning_id).await
    }

    pub async fn list_definitions(
        &self,
        plan_type: Option<PlanType>,
    ) -> PlanningResult<Vec<PlanningDefinition>> {
        info!("Listing planning definitions (type={:?})", plan_type.map(|t| t.code()));
        let definitions = self.planning_repository.list_definitions(plan_type).await?;
        info!("Found {} planning definitions", definitions.len());
        Ok(definitions)
    }

    /// Record the actual value of a definition for one month, creating the
    /// override or replacing its value.
    pub async fn record_month_value(
        &self,
        command: RecordMonthValueCommand,
    ) -> PlanningResult<OverrideResult> {
        info!(
            "Recording value {} for {} in {}",
            command.value, command.planning_id, command.month
        );
        if !command.value.is_finite() {
            return Err(PlanningError::Validation("Value must be a finite number".to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let definition = self.require_definition(&command.planning_id).await?;
        Self::require_active(&definition, command.month)?;

        let mut store = self.load_overrides_of(&definition.id).await?;
        if let (Some(expected), Some(existing)) =
            (command.expected_version, store.find(&definition.id, command.month))
        {
            Self::check_version(existing, expected)?;
        }

        let monthly_override = store
            .upsert(&definition.id, command.month, command.value)
            .clone();
        self.override_repository.store_override(&monthly_override).await?;

        info!(
            "Recorded override {} (version {})",
            monthly_override.id, monthly_override.version
        );
        Ok(OverrideResult { monthly_override })
    }

    pub async fn set_paid(&self, command: SetPaidCommand) -> PlanningResult<OverrideResult> {
        info!("Setting paid={} on override {}", command.is_paid, command.override_id);

        let _guard = self.write_lock.lock().await;
        let existing = self
            .override_repository
            .get_override(&command.override_id)
            .await?
            .ok_or_else(|| PlanningError::OverrideNotFound(command.override_id.clone()))?;
        if let Some(expected) = command.expected_version {
            Self::check_version(&existing, expected)?;
        }

        let mut store = MonthlyOverrideStore::new(vec![existing]);
        let monthly_override = store.set_paid(&command.override_id, command.is_paid)?.clone();
        self.override_repository.store_override(&monthly_override).await?;

        info!(
            "Override {} is now {}",
            monthly_override.id,
            if monthly_override.is_paid { "paid" } else { "unpaid" }
        );
        Ok(OverrideResult { monthly_override })
    }

    /// Toggle the paid flag of a definition in a month. When nothing was
    /// recorded yet, the current default value is recorded first.
    pub async fn set_month_paid(&self, command: SetMonthPaidCommand) -> PlanningResult<OverrideResult> {
        info!(
            "Setting paid={} for {} in {}",
            command.is_paid, command.planning_id, command.month
        );

        let _guard = self.write_lock.lock().await;
        let definition = self.require_definition(&command.planning_id).await?;
        Self::require_active(&definition, command.month)?;

        let mut store = self.load_overrides_of(&definition.id).await?;
        let existing_id = store
            .find(&definition.id, command.month)
            .map(|existing| existing.id.clone());
        let override_id = match existing_id {
            Some(id) => id,
            None => {
                let catalog = PlanningCatalog::new(vec![definition.clone()]);
                let default_value = catalog.default_value_for(&definition).map_err(|e| {
                    warn!(
                        "Cannot materialize default of {} for {}: {}",
                        definition.id, command.month, e
                    );
                    PlanningError::Formula(e)
                })?;
                store
                    .upsert(&definition.id, command.month, default_value)
                    .id
                    .clone()
            }
        };

        let monthly_override = store.set_paid(&override_id, command.is_paid)?.clone();
        self.override_repository.store_override(&monthly_override).await?;
        Ok(OverrideResult { monthly_override })
    }

    pub async fn monthly_totals(&self, month: MonthKey, plan_type: PlanType) -> PlanningResult<MonthlyTotals> {
        Ok(self.month_view(month, plan_type).await?.into())
    }

    pub async fn month_view(&self, month: MonthKey, plan_type: PlanType) -> PlanningResult<MonthlySummary> {
        info!("Building {} month view for {}", plan_type, month);
        let (catalog, store) = self.load_snapshot(plan_type).await?;
        let summary = AggregationEngine::new(&catalog, &store).monthly_summary(month, plan_type);

        if !summary.warnings.is_empty() {
            warn!(
                "{} definitions fell back to zero in {} ({})",
                summary.warnings.len(),
                month,
                plan_type
            );
        }
        Ok(summary)
    }

    pub async fn year_overview(&self, year: i32, plan_type: PlanType) -> PlanningResult<YearOverview> {
        info!("Building {} year overview for {}", plan_type, year);
        let (catalog, store) = self.load_snapshot(plan_type).await?;
        AggregationEngine::new(&catalog, &store)
            .year_overview(year, plan_type)
            .map_err(|e| PlanningError::Validation(e.to_string()))
    }

    /// Evaluate a formula without storing anything.
    pub fn preview_formula(&self, formula: &str) -> PlanningResult<f64> {
        self.evaluator.evaluate(formula).map_err(|e| {
            warn!("Formula preview failed for '{}': {}", formula, e);
            PlanningError::Formula(e)
        })
    }

    async fn require_definition(&self, planning_id: &str) -> PlanningResult<PlanningDefinition> {
        self.planning_repository
            .get_definition(planning_id)
            .await?
            .ok_or_else(|| {
                warn!("Planning definition not found: {}", planning_id);
                PlanningError::DefinitionNotFound(planning_id.to_string())
            })
    }

    fn require_active(definition: &PlanningDefinition, month: MonthKey) -> PlanningResult<()> {
        if definition.is_active_in(month) {
            Ok(())
        } else {
            Err(PlanningError::Validation(format!(
                "'{}' is not active in {}",
                definition.category_name, month
            )))
        }
    }

    fn check_version(existing: &MonthlyOverride, expected: u64) -> PlanningResult<()> {
        if existing.version == expected {
            return Ok(());
        }
        warn!(
            "Version conflict on override {}: expected {}, found {}",
            existing.id, expected, existing.version
        );
        Err(PlanningError::OverrideConflict {
            id: existing.id.clone(),
            expected,
            actual: existing.version,
        })
    }

    async fn load_overrides_of(&self, planning_id: &str) -> PlanningResult<MonthlyOverrideStore> {
        let records = self.override_repository.list_overrides(Some(planning_id)).await?;
        Ok(MonthlyOverrideStore::new(records))
    }

    async fn load_snapshot(
        &self,
        plan_type: PlanType,
    ) -> PlanningResult<(PlanningCatalog, MonthlyOverrideStore)> {
        let definitions = self.planning_repository.list_definitions(Some(plan_type)).await?;
        let overrides = self.override_repository.list_overrides(None).await?;
        Ok((PlanningCatalog::new(definitions), MonthlyOverrideStore::new(overrides)))
    }

    /// Returns the trimmed category and the formula, `None` when blank.
    fn validate_fields(
        &self,
        category_name: &str,
        formula: Option<&str>,
        base_value: f64,
    ) -> PlanningResult<(String, Option<String>)> {
        let category_name = category_name.trim();
        if category_name.is_empty() {
            return Err(PlanningError::Validation("Category name cannot be empty".to_string()));
        }
        if category_name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            return Err(PlanningError::Validation(format!(
                "Category name cannot exceed {} characters",
                MAX_CATEGORY_NAME_LENGTH
            )));
        }
        if !base_value.is_finite() {
            return Err(PlanningError::Validation("Base value must be a finite number".to_string()));
        }

        let formula = formula.map(str::trim).filter(|f| !f.is_empty());
        if let Some(formula) = formula {
            if let Err(e) = self.evaluator.evaluate(formula) {
                return Err(PlanningError::Validation(format!("Invalid formula '{}': {}", formula, e)));
            }
        }

        Ok((category_name.to_string(), formula.map(str::to_string)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregation::Resolution;
    use crate::storage::memory::InMemoryConnection;
    use shared::MonthItemState;

    fn month(raw: &str) -> MonthKey {
        raw.parse().unwrap()
    }

    fn service(retention: OverrideRetention) -> (InMemoryConnection, PlanningService<InMemoryConnection>) {
        let connection = InMemoryConnection::new();
        let service = PlanningService::new(&connection, retention);
        (connection, service)
    }

    fn create_command(plan_type: PlanType, category: &str, formula: Option<&str>, base_value: f64) -> CreateDefinitionCommand {
        CreateDefinitionCommand {
            plan_type,
            category_name: category.to_string(),
            formula: formula.map(str::to_string),
            base_value,
            end_month: None,
        }
    }

    #[tokio::test]
    async fn test_business_tax_scenario_end_to_end() {
        let (_, service) = service(OverrideRetention::Retain);
        let inss = service
            .create_definition(create_command(PlanType::Business, "INSS", Some("(5000*28%)*27.5%"), 0.0))
            .await
            .unwrap()
            .definition;
        let january = month("2025-01");

        let before = service.monthly_totals(january, PlanType::Business).await.unwrap();
        assert_eq!(before.total, 385.0);
        assert_eq!(before.pending_total, 385.0);

        let recorded = service
            .record_month_value(RecordMonthValueCommand {
                planning_id: inss.id.clone(),
                month: january,
                value: 400.0,
                expected_version: None,
            })
            .await
            .unwrap()
            .monthly_override;
        service
            .set_paid(SetPaidCommand {
                override_id: recorded.id.clone(),
                is_paid: true,
                expected_version: Some(recorded.version),
            })
            .await
            .unwrap();

        let after = service.monthly_totals(january, PlanType::Business).await.unwrap();
        assert_eq!(after.total, 400.0);
        assert_eq!(after.pending_total, 0.0);
        assert_eq!(after.paid_total, 400.0);

        // Other months still fall back to the formula
        let february = service.monthly_totals(month("2025-02"), PlanType::Business).await.unwrap();
        assert_eq!(february.total, 385.0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let (_, service) = service(OverrideRetention::Retain);

        let blank = service
            .create_definition(create_command(PlanType::Personal, "   ", None, 10.0))
            .await;
        assert!(matches!(blank, Err(PlanningError::Validation(_))));

        let long_name = "x".repeat(MAX_CATEGORY_NAME_LENGTH + 1);
        let too_long = service
            .create_definition(create_command(PlanType::Personal, &long_name, None, 10.0))
            .await;
        assert!(matches!(too_long, Err(PlanningError::Validation(_))));

        let bad_formula = service
            .create_definition(create_command(PlanType::Personal, "Rent", Some("abc"), 10.0))
            .await;
        assert!(matches!(bad_formula, Err(PlanningError::Validation(_))));

        let nan = service
            .create_definition(create_command(PlanType::Personal, "Rent", None, f64::NAN))
            .await;
        assert!(matches!(nan, Err(PlanningError::Validation(_))));

        assert!(service.list_definitions(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_formula_is_stored_as_none() {
        let (_, service) = service(OverrideRetention::Retain);
        let definition = service
            .create_definition(create_command(PlanType::Personal, "  Rent ", Some("  "), 1200.0))
            .await
            .unwrap()
            .definition;
        assert_eq!(definition.category_name, "Rent");
        assert_eq!(definition.formula, None);
    }

    #[tokio::test]
    async fn test_update_definition_and_missing_id() {
        let (_, service) = service(OverrideRetention::Retain);
        let created = service
            .create_definition(create_command(PlanType::Personal, "Rent", None, 1200.0))
            .await
            .unwrap()
            .definition;

        let updated = service
            .update_definition(UpdateDefinitionCommand {
                planning_id: created.id.clone(),
                plan_type: PlanType::Personal,
                category_name: "Rent".to_string(),
                formula: Some("1200+150".to_string()),
                base_value: 0.0,
                end_month: Some(month("2025-06")),
            })
            .await
            .unwrap()
            .definition;
        assert_eq!(updated.formula.as_deref(), Some("1200+150"));
        assert_eq!(service.get_definition(&created.id).await.unwrap().end_month, Some(month("2025-06")));

        let missing = service
            .update_definition(UpdateDefinitionCommand {
                planning_id: "planning::missing".to_string(),
                plan_type: PlanType::Personal,
                category_name: "Rent".to_string(),
                formula: None,
                base_value: 1.0,
                end_month: None,
            })
            .await;
        assert!(matches!(missing, Err(PlanningError::DefinitionNotFound(_))));
    }

    #[tokio::test]
    async fn test_record_twice_updates_same_override() {
        let (_, service) = service(OverrideRetention::Retain);
        let rent = service
            .create_definition(create_command(PlanType::Personal, "Rent", None, 1200.0))
            .await
            .unwrap()
            .definition;
        let record = |value: f64, expected_version: Option<u64>| RecordMonthValueCommand {
            planning_id: rent.id.clone(),
            month: month("2025-03"),
            value,
            expected_version,
        };

        let first = service.record_month_value(record(1250.0, None)).await.unwrap().monthly_override;
        let second = service
            .record_month_value(record(1300.0, Some(first.version)))
            .await
            .unwrap()
            .monthly_override;

        assert_eq!(first.id, second.id);
        assert_eq!(second.value, 1300.0);
        assert_eq!(second.version, first.version + 1);
    }

    #[tokio::test]
    async fn test_stale_version_is_a_conflict() {
        let (_, service) = service(OverrideRetention::Retain);
        let rent = service
            .create_definition(create_command(PlanType::Personal, "Rent", None, 1200.0))
            .await
            .unwrap()
            .definition;
        let recorded = service
            .record_month_value(RecordMonthValueCommand {
                planning_id: rent.id.clone(),
                month: month("2025-03"),
                value: 1250.0,
                expected_version: None,
            })
            .await
            .unwrap()
            .monthly_override;

        service
            .set_paid(SetPaidCommand {
                override_id: recorded.id.clone(),
                is_paid: true,
                expected_version: Some(recorded.version),
            })
            .await
            .unwrap();

        let stale = service
            .set_paid(SetPaidCommand {
                override_id: recorded.id.clone(),
                is_paid: false,
                expected_version: Some(recorded.version),
            })
            .await;
        match stale {
            Err(PlanningError::OverrideConflict { expected, actual, .. }) => {
                assert_eq!(expected, recorded.version);
                assert_eq!(actual, recorded.version + 1);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_set_paid_unknown_override() {
        let (_, service) = service(OverrideRetention::Retain);
        let result = service
            .set_paid(SetPaidCommand {
                override_id: "override::missing".to_string(),
                is_paid: true,
                expected_version: None,
            })
            .await;
        assert!(matches!(result, Err(PlanningError::OverrideNotFound(id)) if id == "override::missing"));
    }

    #[tokio::test]
    async fn test_set_month_paid_materializes_default_value() {
        let (_, service) = service(OverrideRetention::Retain);
        let das = service
            .create_definition(create_command(PlanType::Business, "DAS", Some("3000*6%"), 0.0))
            .await
            .unwrap()
            .definition;
        let april = month("2025-04");

        let paid = service
            .set_month_paid(SetMonthPaidCommand {
                planning_id: das.id.clone(),
                month: april,
                is_paid: true,
            })
            .await
            .unwrap()
            .monthly_override;
        assert_eq!(paid.value, 180.0);
        assert!(paid.is_paid);
        assert!(paid.paid_date.is_some());

        let view = service.month_view(april, PlanType::Business).await.unwrap();
        assert_eq!(view.items[0].resolution.state(), MonthItemState::RecordedPaid);
        assert_eq!(view.pending_total, 0.0);

        let unpaid = service
            .set_month_paid(SetMonthPaidCommand {
                planning_id: das.id.clone(),
                month: april,
                is_paid: false,
            })
            .await
            .unwrap()
            .monthly_override;
        assert_eq!(unpaid.id, paid.id);
        assert!(unpaid.paid_date.is_none());
        assert_eq!(service.monthly_totals(april, PlanType::Business).await.unwrap().pending_total, 180.0);
    }

    #[tokio::test]
    async fn test_recording_after_end_month_is_rejected() {
        let (_, service) = service(OverrideRetention::Retain);
        let mut command = create_command(PlanType::Personal, "Course", None, 300.0);
        command.end_month = Some(month("2024-03"));
        let course = service.create_definition(command).await.unwrap().definition;

        let result = service
            .record_month_value(RecordMonthValueCommand {
                planning_id: course.id.clone(),
                month: month("2024-04"),
                value: 300.0,
                expected_version: None,
            })
            .await;
        assert!(matches!(result, Err(PlanningError::Validation(_))));

        let march = service.monthly_totals(month("2024-03"), PlanType::Personal).await.unwrap();
        let april = service.monthly_totals(month("2024-04"), PlanType::Personal).await.unwrap();
        assert_eq!(march.total, 300.0);
        assert_eq!(april.total, 0.0);
    }

    #[tokio::test]
    async fn test_delete_with_retain_keeps_overrides() {
        let (connection, service) = service(OverrideRetention::Retain);
        let rent = service
            .create_definition(create_command(PlanType::Personal, "Rent", None, 1200.0))
            .await
            .unwrap()
            .definition;
        service
            .record_month_value(RecordMonthValueCommand {
                planning_id: rent.id.clone(),
                month: month("2025-01"),
                value: 1250.0,
                expected_version: None,
            })
            .await
            .unwrap();

        let result = service.delete_definition(&rent.id).await.unwrap();
        assert_eq!(result.removed_overrides, 0);
        let overrides = connection.create_override_repository().list_overrides(None).await.unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(service.monthly_totals(month("2025-01"), PlanType::Personal).await.unwrap().total, 0.0);
    }

    #[tokio::test]
    async fn test_delete_with_cascade_removes_overrides() {
        let (connection, service) = service(OverrideRetention::Cascade);
        let rent = service
            .create_definition(create_command(PlanType::Personal, "Rent", None, 1200.0))
            .await
            .unwrap()
            .definition;
        for m in ["2025-01", "2025-02"] {
            service
                .record_month_value(RecordMonthValueCommand {
                    planning_id: rent.id.clone(),
                    month: month(m),
                    value: 1250.0,
                    expected_version: None,
                })
                .await
                .unwrap();
        }

        let result = service.delete_definition(&rent.id).await.unwrap();
        assert_eq!(result.removed_overrides, 2);
        assert_eq!(result.deleted.id, rent.id);
        let overrides = connection.create_override_repository().list_overrides(None).await.unwrap();
        assert!(overrides.is_empty());

        let again = service.delete_definition(&rent.id).await;
        assert!(matches!(again, Err(PlanningError::DefinitionNotFound(_))));
    }

    #[tokio::test]
    async fn test_broken_stored_formula_becomes_a_warning() {
        let (connection, service) = service(OverrideRetention::Retain);
        let now = Utc::now();
        connection
            .create_planning_repository()
            .store_definition(&PlanningDefinition {
                id: PlanningDefinition::generate_id(),
                plan_type: PlanType::Personal,
                category_name: "Broken".to_string(),
                formula: Some("10%3".to_string()),
                base_value: 50.0,
                end_month: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        service
            .create_definition(create_command(PlanType::Personal, "Rent", None, 1200.0))
            .await
            .unwrap();

        let view = service.month_view(month("2025-01"), PlanType::Personal).await.unwrap();
        assert_eq!(view.total, 1200.0);
        assert_eq!(view.warnings.len(), 1);
        assert_eq!(view.warnings[0].category_name, "Broken");
        assert_eq!(view.items[0].resolution, Resolution::Default(0.0));
    }

    #[tokio::test]
    async fn test_set_month_paid_fails_when_default_cannot_be_computed() {
        let (connection, service) = service(OverrideRetention::Retain);
        let now = Utc::now();
        let broken = PlanningDefinition {
            id: PlanningDefinition::generate_id(),
            plan_type: PlanType::Business,
            category_name: "Broken".to_string(),
            formula: Some("10%3".to_string()),
            base_value: 50.0,
            end_month: None,
            created_at: now,
            updated_at: now,
        };
        connection
            .create_planning_repository()
            .store_definition(&broken)
            .await
            .unwrap();

        let result = service
            .set_month_paid(SetMonthPaidCommand {
                planning_id: broken.id.clone(),
                month: month("2025-04"),
                is_paid: true,
            })
            .await;
        assert!(matches!(result, Err(PlanningError::Formula(_))));
        assert_eq!(result.unwrap_err().kind(), "formula_syntax");

        let overrides = connection
            .create_override_repository()
            .list_overrides(None)
            .await
            .unwrap();
        assert!(overrides.is_empty());
    }

    #[tokio::test]
    async fn test_year_overview_sums_months() {
        let (_, service) = service(OverrideRetention::Retain);
        let mut command = create_command(PlanType::Personal, "Gym", None, 100.0);
        command.end_month = Some(month("2025-06"));
        service.create_definition(command).await.unwrap();

        let overview = service.year_overview(2025, PlanType::Personal).await.unwrap();
        assert_eq!(overview.months.len(), 12);
        assert_eq!(overview.total, 600.0);
        assert_eq!(overview.pending_total, 600.0);
    }

    #[tokio::test]
    async fn test_preview_formula() {
        let (_, service) = service(OverrideRetention::Retain);
        assert_eq!(service.preview_formula("3000-6%").unwrap(), 2820.0);
        assert!(matches!(service.preview_formula("abc"), Err(PlanningError::Formula(_))));
    }
}
