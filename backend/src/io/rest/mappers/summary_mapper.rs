use shared::{MonthItem, MonthViewResponse, MonthlyTotalsResponse, YearOverviewResponse};

use crate::domain::aggregation::{MonthlySummary, MonthlyTotals, PlannedItem, Resolution, YearOverview};

pub struct SummaryMapper;

impl SummaryMapper {
    pub fn to_month_item(item: PlannedItem) -> MonthItem {
        let state = item.resolution.state();
        let value = item.resolution.value();
        let pending_value = item.resolution.pending_value();
        let override_id = match item.resolution {
            Resolution::Overridden { override_id, .. } => Some(override_id),
            Resolution::Default(_) => None,
        };

        MonthItem {
            planning_id: item.planning_id,
            category_name: item.category_name,
            state,
            override_id,
            override_version: item.override_version,
            value,
            pending_value,
            paid_date: item.paid_date.map(|d| d.to_rfc3339()),
        }
    }

    pub fn to_month_view_response(summary: MonthlySummary) -> MonthViewResponse {
        MonthViewResponse {
            month: summary.month.to_string(),
            plan_type: summary.plan_type,
            total: summary.total,
            pending_total: summary.pending_total,
            paid_total: summary.paid_total,
            items: summary.items.into_iter().map(Self::to_month_item).collect(),
            warnings: summary.warnings,
        }
    }

    pub fn to_totals_response(totals: MonthlyTotals) -> MonthlyTotalsResponse {
        MonthlyTotalsResponse {
            month: totals.month.to_string(),
            plan_type: totals.plan_type,
            total: totals.total,
            pending_total: totals.pending_total,
            paid_total: totals.paid_total,
            warnings: totals.warnings,
        }
    }

    /// Year overviews carry per-month totals only
    pub fn to_year_overview_response(overview: YearOverview) -> YearOverviewResponse {
        YearOverviewResponse {
            year: overview.year,
            plan_type: overview.plan_type,
            months: overview
                .months
                .into_iter()
                .map(|summary| Self::to_totals_response(summary.into()))
                .collect(),
            total: overview.total,
            pending_total: overview.pending_total,
        }
    }
}
