use shared::{CreatePlanningRequest, PlanningDefinition as PlanningDefinitionDto, UpdatePlanningRequest};

use crate::domain::commands::{CreateDefinitionCommand, UpdateDefinitionCommand};
use crate::domain::errors::{PlanningError, PlanningResult};
use crate::domain::models::{MonthKey, PlanningDefinition};

pub struct PlanningMapper;

impl PlanningMapper {
    /// Convert domain PlanningDefinition to shared DTO
    pub fn to_dto(domain: PlanningDefinition) -> PlanningDefinitionDto {
        PlanningDefinitionDto {
            id: domain.id,
            plan_type: domain.plan_type,
            category_name: domain.category_name,
            formula: domain.formula,
            base_value: domain.base_value,
            end_month: domain.end_month.map(|m| m.to_string()),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(definitions: Vec<PlanningDefinition>) -> Vec<PlanningDefinitionDto> {
        definitions.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: CreatePlanningRequest) -> PlanningResult<CreateDefinitionCommand> {
        Ok(CreateDefinitionCommand {
            plan_type: request.plan_type,
            category_name: request.category_name,
            formula: request.formula,
            base_value: request.base_value,
            end_month: Self::parse_end_month(request.end_month.as_deref())?,
        })
    }

    pub fn to_update_command(
        planning_id: String,
        request: UpdatePlanningRequest,
    ) -> PlanningResult<UpdateDefinitionCommand> {
        Ok(UpdateDefinitionCommand {
            planning_id,
            plan_type: request.plan_type,
            category_name: request.category_name,
            formula: request.formula,
            base_value: request.base_value,
            end_month: Self::parse_end_month(request.end_month.as_deref())?,
        })
    }

    /// A blank end month means the definition never ends
    fn parse_end_month(raw: Option<&str>) -> PlanningResult<Option<MonthKey>> {
        match raw.map(str::trim).filter(|m| !m.is_empty()) {
            Some(month) => month
                .parse::<MonthKey>()
                .map(Some)
                .map_err(|e| PlanningError::Validation(format!("Invalid end month: {}", e))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::PlanType;

    fn request(end_month: Option<&str>) -> CreatePlanningRequest {
        CreatePlanningRequest {
            plan_type: PlanType::Business,
            category_name: "DAS".to_string(),
            formula: Some("3000*6%".to_string()),
            base_value: 0.0,
            end_month: end_month.map(str::to_string),
        }
    }

    #[test]
    fn test_end_month_parsing() {
        let command = PlanningMapper::to_create_command(request(Some("2025-12"))).unwrap();
        assert_eq!(command.end_month, Some("2025-12".parse().unwrap()));

        let blank = PlanningMapper::to_create_command(request(Some(" "))).unwrap();
        assert_eq!(blank.end_month, None);

        let invalid = PlanningMapper::to_create_command(request(Some("2025-13")));
        assert!(matches!(invalid, Err(PlanningError::Validation(_))));
    }

    #[test]
    fn test_to_dto_formats_month_and_timestamps() {
        let now = Utc::now();
        let dto = PlanningMapper::to_dto(PlanningDefinition {
            id: "planning::x".to_string(),
            plan_type: PlanType::Personal,
            category_name: "Rent".to_string(),
            formula: None,
            base_value: 1200.0,
            end_month: Some("2026-02".parse().unwrap()),
            created_at: now,
            updated_at: now,
        });
        assert_eq!(dto.end_month.as_deref(), Some("2026-02"));
        assert_eq!(dto.created_at, now.to_rfc3339());
    }
}
