use shared::MonthlyOverride as MonthlyOverrideDto;

use crate::domain::models::MonthlyOverride;

pub struct OverrideMapper;

impl OverrideMapper {
    /// Convert domain MonthlyOverride to shared DTO
    pub fn to_dto(domain: MonthlyOverride) -> MonthlyOverrideDto {
        MonthlyOverrideDto {
            id: domain.id,
            planning_id: domain.planning_id,
            month: domain.month.to_string(),
            value: domain.value,
            is_paid: domain.is_paid,
            paid_date: domain.paid_date.map(|d| d.to_rfc3339()),
            version: domain.version,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }
}
