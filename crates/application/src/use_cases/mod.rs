mod observe_domain;
mod report_pending;
mod report_stats;

pub use observe_domain::ObserveDomainUseCase;
pub use report_pending::ReportPendingUseCase;
pub use report_stats::ReportStatsUseCase;
