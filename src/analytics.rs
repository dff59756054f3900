/// Dashboard and reporting aggregation
///
/// Pure functions over already-fetched slices. The HTTP layer gathers the
/// collections and passes an explicit clock, so everything here is
/// deterministic and re-entrant; nothing does I/O.
use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{
    Account, AccountRole, AccountStatus, Booking, BookingStatus, DashboardStats, Dispute,
    DisputeStatus,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Reporting windows offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Week,
    Month,
    Quarter,
    Year,
}

impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow::Month
    }
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Week => "7d",
            TimeWindow::Month => "30d",
            TimeWindow::Quarter => "90d",
            TimeWindow::Year => "1y",
        }
    }

    pub fn from_str(s: &str) -> ConsoleResult<Self> {
        match s {
            "7d" => Ok(TimeWindow::Week),
            "30d" => Ok(TimeWindow::Month),
            "90d" => Ok(TimeWindow::Quarter),
            "1y" => Ok(TimeWindow::Year),
            _ => Err(ConsoleError::InvalidArgument(format!(
                "Invalid time window: {}",
                s
            ))),
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::Week => Duration::days(7),
            TimeWindow::Month => Duration::days(30),
            TimeWindow::Quarter => Duration::days(90),
            TimeWindow::Year => Duration::days(365),
        }
    }
}

/// One slice of the booking status distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSlice {
    pub status: BookingStatus,
    pub count: u64,
    pub percentage: f64,
}

/// One calendar month of completed-booking revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRevenue {
    pub month: String,
    pub revenue: f64,
}

/// Worker skill tally for the top-skills widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: u64,
}

/// Windowed analytics report for the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReport {
    pub window: String,
    pub new_users: u64,
    pub new_bookings: u64,
    pub window_revenue: f64,
    pub completion_rate: u64,
    pub status_distribution: Vec<StatusSlice>,
    pub monthly_revenue: Vec<MonthRevenue>,
    pub top_skills: Vec<SkillCount>,
}

/// Headline dashboard numbers. Revenue counts completed bookings only;
/// the monthly figure is the trailing 30 days from `now`.
pub fn dashboard_stats(
    accounts: &[Account],
    bookings: &[Booking],
    disputes: &[Dispute],
    now: DateTime<Utc>,
) -> DashboardStats {
    let month_ago = now - Duration::days(30);

    let total_workers = accounts
        .iter()
        .filter(|a| a.role == AccountRole::Worker)
        .count() as u64;
    let total_employers = accounts
        .iter()
        .filter(|a| a.role == AccountRole::Employer)
        .count() as u64;
    let pending_approvals = accounts
        .iter()
        .filter(|a| a.status == AccountStatus::Pending)
        .count() as u64;

    let active_bookings = bookings
        .iter()
        .filter(|b| matches!(b.status, BookingStatus::Pending | BookingStatus::Accepted))
        .count() as u64;

    let mut completed_bookings = 0u64;
    let mut total_revenue = 0.0;
    let mut monthly_revenue = 0.0;
    for booking in bookings {
        if booking.status != BookingStatus::Completed {
            continue;
        }
        completed_bookings += 1;
        total_revenue += booking.payment.amount;
        if booking.created_at.map(|t| t >= month_ago).unwrap_or(false) {
            monthly_revenue += booking.payment.amount;
        }
    }

    let pending_disputes = disputes
        .iter()
        .filter(|d| d.status == DisputeStatus::Open)
        .count() as u64;

    DashboardStats {
        total_users: accounts.len() as u64,
        total_workers,
        total_employers,
        pending_approvals,
        active_bookings,
        completed_bookings,
        pending_disputes,
        total_revenue,
        monthly_revenue,
    }
}

/// Full windowed report: window-filtered counts and revenue, plus the
/// all-time distribution, monthly series, and skill tallies.
pub fn window_report(
    accounts: &[Account],
    bookings: &[Booking],
    now: DateTime<Utc>,
    window: TimeWindow,
) -> WindowReport {
    let cutoff = now - window.duration();

    let new_users = filter_window(accounts, cutoff, "user", |a| a.created_at).len() as u64;
    let window_bookings = filter_window(bookings, cutoff, "booking", |b| b.created_at);

    let window_revenue = window_bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .map(|b| b.payment.amount)
        .sum();

    WindowReport {
        window: window.as_str().to_string(),
        new_users,
        new_bookings: window_bookings.len() as u64,
        window_revenue,
        completion_rate: completion_rate(&window_bookings),
        status_distribution: status_distribution(bookings),
        monthly_revenue: monthly_revenue_series(bookings),
        top_skills: top_worker_skills(accounts),
    }
}

/// Share of window bookings that completed, as a whole percentage.
/// An empty window reports 0 rather than dividing by zero.
fn completion_rate(window_bookings: &[&Booking]) -> u64 {
    if window_bookings.is_empty() {
        return 0;
    }
    let completed = window_bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .count();
    ((completed as f64 / window_bookings.len() as f64) * 100.0).round() as u64
}

/// Booking status distribution over the entire set, one slice per status
/// in a fixed order. All zeros when there are no bookings.
pub fn status_distribution(bookings: &[Booking]) -> Vec<StatusSlice> {
    let total = bookings.len();
    BookingStatus::all()
        .into_iter()
        .map(|status| {
            let count = bookings.iter().filter(|b| b.status == status).count() as u64;
            let percentage = if total == 0 {
                0.0
            } else {
                (count as f64 / total as f64) * 100.0
            };
            StatusSlice {
                status,
                count,
                percentage,
            }
        })
        .collect()
}

/// Completed-booking revenue grouped by calendar month, oldest to newest,
/// truncated to the most recent six months that saw revenue
pub fn monthly_revenue_series(bookings: &[Booking]) -> Vec<MonthRevenue> {
    let mut buckets: HashMap<(i32, u32), f64> = HashMap::new();
    let mut excluded = 0usize;
    for booking in bookings {
        if booking.status != BookingStatus::Completed {
            continue;
        }
        match booking.created_at {
            Some(t) => {
                *buckets.entry((t.year(), t.month())).or_insert(0.0) += booking.payment.amount;
            }
            None => excluded += 1,
        }
    }
    if excluded > 0 {
        tracing::warn!(
            "{} completed bookings lack a parseable createdAt, excluded from monthly revenue",
            excluded
        );
    }

    let mut months: Vec<((i32, u32), f64)> = buckets.into_iter().collect();
    months.sort_by_key(|(key, _)| *key);

    let start = months.len().saturating_sub(6);
    months[start..]
        .iter()
        .map(|((year, month), revenue)| MonthRevenue {
            month: month_label(*year, *month),
            revenue: *revenue,
        })
        .collect()
}

/// Five most common worker skills, descending by count. Stable sort, so
/// ties keep first-encountered order.
pub fn top_worker_skills(accounts: &[Account]) -> Vec<SkillCount> {
    let mut tallies: Vec<(String, u64)> = Vec::new();
    for account in accounts {
        if account.role != AccountRole::Worker {
            continue;
        }
        let Some(skills) = &account.profile.skills else {
            continue;
        };
        for skill in skills {
            match tallies.iter_mut().find(|(s, _)| s == skill) {
                Some((_, n)) => *n += 1,
                None => tallies.push((skill.clone(), 1)),
            }
        }
    }

    tallies.sort_by(|a, b| b.1.cmp(&a.1));
    tallies.truncate(5);
    tallies
        .into_iter()
        .map(|(skill, count)| SkillCount { skill, count })
        .collect()
}

fn filter_window<'a, T, F>(
    items: &'a [T],
    cutoff: DateTime<Utc>,
    what: &str,
    created: F,
) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut kept = Vec::new();
    let mut excluded = 0usize;
    for item in items {
        match created(item) {
            Some(t) if t >= cutoff => kept.push(item),
            Some(_) => {}
            None => excluded += 1,
        }
    }
    if excluded > 0 {
        tracing::warn!(
            "{} {} records lack a parseable createdAt, excluded from the window",
            excluded,
            what
        );
    }
    kept
}

fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d.format("%b %Y").to_string(),
        None => format!("{} {}", month, year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, Payment, PaymentStatus, Profile};

    fn account(id: &str, role: AccountRole, status: AccountStatus, created: &str) -> Account {
        Account {
            id: id.to_string(),
            role,
            phone_number: "+923000000000".to_string(),
            email: format!("{}@example.com", id),
            profile: Profile {
                first_name: String::new(),
                last_name: String::new(),
                full_name: id.to_string(),
                address: String::new(),
                cnic: None,
                cnic_verified: false,
                cnic_photos: None,
                skills: None,
                rating: None,
                description: None,
                experience_years: None,
                hourly_rate: None,
                profile_picture: None,
            },
            status,
            created_at: DateTime::parse_from_rfc3339(created)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            updated_at: None,
        }
    }

    fn worker_with_skills(id: &str, skills: &[&str]) -> Account {
        let mut account = account(
            id,
            AccountRole::Worker,
            AccountStatus::Approved,
            "2026-01-01T00:00:00+00:00",
        );
        account.profile.skills = Some(skills.iter().map(|s| s.to_string()).collect());
        account
    }

    fn booking(id: &str, status: BookingStatus, amount: f64, created: Option<&str>) -> Booking {
        Booking {
            id: id.to_string(),
            worker_id: "w1".to_string(),
            employer_id: "e1".to_string(),
            status,
            date: "2026-06-15".to_string(),
            task: "Fix kitchen sink".to_string(),
            description: None,
            location: Location {
                latitude: 31.5204,
                longitude: 74.3587,
                address: "Lahore".to_string(),
            },
            payment: Payment {
                amount,
                status: PaymentStatus::Completed,
            },
            created_at: created
                .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
                .map(|t| t.with_timezone(&Utc)),
        }
    }

    fn dispute(id: &str, status: DisputeStatus) -> Dispute {
        Dispute {
            id: id.to_string(),
            booking_id: "b1".to_string(),
            reporter_id: "u1".to_string(),
            reported_user_id: "u2".to_string(),
            kind: crate::model::DisputeKind::Payment,
            description: String::new(),
            status,
            created_at: None,
            resolution: None,
            resolved_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-07-01T00:00:00+00:00")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_window_parsing() {
        assert_eq!(TimeWindow::from_str("7d").unwrap(), TimeWindow::Week);
        assert_eq!(TimeWindow::from_str("1y").unwrap(), TimeWindow::Year);
        assert!(TimeWindow::from_str("14d").is_err());
        assert_eq!(TimeWindow::default(), TimeWindow::Month);
        assert_eq!(TimeWindow::Quarter.duration(), Duration::days(90));
    }

    #[test]
    fn test_dashboard_stats_counts_and_revenue() {
        let accounts = vec![
            account("w1", AccountRole::Worker, AccountStatus::Approved, "2026-01-01T00:00:00+00:00"),
            account("w2", AccountRole::Worker, AccountStatus::Pending, "2026-06-20T00:00:00+00:00"),
            account("e1", AccountRole::Employer, AccountStatus::Approved, "2026-02-01T00:00:00+00:00"),
            account("a1", AccountRole::Admin, AccountStatus::Approved, "2025-01-01T00:00:00+00:00"),
        ];
        let bookings = vec![
            booking("b1", BookingStatus::Pending, 500.0, Some("2026-06-25T00:00:00+00:00")),
            booking("b2", BookingStatus::Accepted, 800.0, Some("2026-06-26T00:00:00+00:00")),
            booking("b3", BookingStatus::Completed, 1000.0, Some("2026-06-27T00:00:00+00:00")),
            booking("b4", BookingStatus::Completed, 700.0, Some("2026-01-05T00:00:00+00:00")),
            booking("b5", BookingStatus::Cancelled, 300.0, Some("2026-06-01T00:00:00+00:00")),
        ];
        let disputes = vec![
            dispute("d1", DisputeStatus::Open),
            dispute("d2", DisputeStatus::Resolved),
            dispute("d3", DisputeStatus::Investigating),
        ];

        let stats = dashboard_stats(&accounts, &bookings, &disputes, now());

        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.total_workers, 2);
        assert_eq!(stats.total_employers, 1);
        assert_eq!(stats.pending_approvals, 1);
        assert_eq!(stats.active_bookings, 2);
        assert_eq!(stats.completed_bookings, 2);
        assert_eq!(stats.pending_disputes, 1);
        assert_eq!(stats.total_revenue, 1700.0);
        // Only b3 completed inside the trailing 30 days
        assert_eq!(stats.monthly_revenue, 1000.0);
    }

    #[test]
    fn test_window_revenue_and_distribution() {
        // 10 bookings, 4 completed worth 100+200+150+50
        let mut bookings = vec![
            booking("b1", BookingStatus::Completed, 100.0, Some("2026-06-20T00:00:00+00:00")),
            booking("b2", BookingStatus::Completed, 200.0, Some("2026-06-21T00:00:00+00:00")),
            booking("b3", BookingStatus::Completed, 150.0, Some("2026-06-22T00:00:00+00:00")),
            booking("b4", BookingStatus::Completed, 50.0, Some("2026-06-23T00:00:00+00:00")),
        ];
        for i in 0..3 {
            bookings.push(booking(
                &format!("p{}", i),
                BookingStatus::Pending,
                999.0,
                Some("2026-06-24T00:00:00+00:00"),
            ));
        }
        for i in 0..2 {
            bookings.push(booking(
                &format!("a{}", i),
                BookingStatus::Accepted,
                999.0,
                Some("2026-06-25T00:00:00+00:00"),
            ));
        }
        bookings.push(booking(
            "c1",
            BookingStatus::Cancelled,
            999.0,
            Some("2026-06-26T00:00:00+00:00"),
        ));

        let report = window_report(&[], &bookings, now(), TimeWindow::Month);

        assert_eq!(report.new_bookings, 10);
        assert_eq!(report.window_revenue, 500.0);
        assert_eq!(report.completion_rate, 40);

        let total: u64 = report.status_distribution.iter().map(|s| s.count).sum();
        assert_eq!(total, 10);
        let completed = report
            .status_distribution
            .iter()
            .find(|s| s.status == BookingStatus::Completed)
            .unwrap();
        assert_eq!(completed.count, 4);
        assert!((completed.percentage - 40.0).abs() < f64::EPSILON);

        let pct_sum: f64 = report.status_distribution.iter().map(|s| s.percentage).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sets_produce_zeros() {
        let report = window_report(&[], &[], now(), TimeWindow::Week);
        assert_eq!(report.new_users, 0);
        assert_eq!(report.new_bookings, 0);
        assert_eq!(report.window_revenue, 0.0);
        assert_eq!(report.completion_rate, 0);
        assert!(report.monthly_revenue.is_empty());
        assert!(report.top_skills.is_empty());
        for slice in &report.status_distribution {
            assert_eq!(slice.count, 0);
            assert_eq!(slice.percentage, 0.0);
        }
    }

    #[test]
    fn test_completion_rate_rounds_to_whole_percent() {
        let bookings = vec![
            booking("b1", BookingStatus::Completed, 100.0, Some("2026-06-20T00:00:00+00:00")),
            booking("b2", BookingStatus::Pending, 100.0, Some("2026-06-21T00:00:00+00:00")),
            booking("b3", BookingStatus::Pending, 100.0, Some("2026-06-22T00:00:00+00:00")),
        ];
        let report = window_report(&[], &bookings, now(), TimeWindow::Month);
        // 1/3 rounds to 33
        assert_eq!(report.completion_rate, 33);
    }

    #[test]
    fn test_window_excludes_old_and_unparseable() {
        let accounts = vec![
            account("u1", AccountRole::Worker, AccountStatus::Pending, "2026-06-28T00:00:00+00:00"),
            account("u2", AccountRole::Worker, AccountStatus::Pending, "2025-01-01T00:00:00+00:00"),
        ];
        let bookings = vec![
            booking("b1", BookingStatus::Completed, 100.0, Some("2026-06-28T00:00:00+00:00")),
            booking("b2", BookingStatus::Completed, 900.0, Some("2025-06-28T00:00:00+00:00")),
            booking("b3", BookingStatus::Completed, 400.0, None),
        ];

        let report = window_report(&accounts, &bookings, now(), TimeWindow::Month);

        assert_eq!(report.new_users, 1);
        assert_eq!(report.new_bookings, 1);
        assert_eq!(report.window_revenue, 100.0);
        // The unparseable booking still counts in the all-time distribution
        let completed = report
            .status_distribution
            .iter()
            .find(|s| s.status == BookingStatus::Completed)
            .unwrap();
        assert_eq!(completed.count, 3);
    }

    #[test]
    fn test_monthly_series_chronological_and_capped() {
        let mut bookings = Vec::new();
        for month in 1..=8u32 {
            bookings.push(booking(
                &format!("b{}", month),
                BookingStatus::Completed,
                100.0 * month as f64,
                Some(&format!("2026-{:02}-15T00:00:00+00:00", month)),
            ));
        }
        // A second January booking folds into the same bucket
        bookings.push(booking(
            "b1x",
            BookingStatus::Completed,
            50.0,
            Some("2026-01-20T00:00:00+00:00"),
        ));

        let series = monthly_revenue_series(&bookings);

        assert_eq!(series.len(), 6);
        assert_eq!(series[0].month, "Mar 2026");
        assert_eq!(series[5].month, "Aug 2026");
        assert_eq!(series[5].revenue, 800.0);

        let labels: Vec<&str> = series.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Mar 2026", "Apr 2026", "May 2026", "Jun 2026", "Jul 2026", "Aug 2026"]
        );
    }

    #[test]
    fn test_monthly_series_ignores_incomplete_bookings() {
        let bookings = vec![
            booking("b1", BookingStatus::Completed, 250.0, Some("2026-01-15T00:00:00+00:00")),
            booking("b2", BookingStatus::Pending, 999.0, Some("2026-01-16T00:00:00+00:00")),
        ];
        let series = monthly_revenue_series(&bookings);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].month, "Jan 2026");
        assert_eq!(series[0].revenue, 250.0);
    }

    #[test]
    fn test_top_skills_counts_and_tie_order() {
        let accounts = vec![
            worker_with_skills("w1", &["plumbing", "electrical"]),
            worker_with_skills("w2", &["plumbing", "painting"]),
            worker_with_skills("w3", &["plumbing", "electrical", "carpentry"]),
            worker_with_skills("w4", &["masonry", "painting"]),
            worker_with_skills("w5", &["welding"]),
            // Employers never contribute skills
            account("e1", AccountRole::Employer, AccountStatus::Approved, "2026-01-01T00:00:00+00:00"),
        ];

        let skills = top_worker_skills(&accounts);

        assert_eq!(skills.len(), 5);
        assert_eq!(skills[0].skill, "plumbing");
        assert_eq!(skills[0].count, 3);
        // electrical and painting both count 2; electrical was seen first
        assert_eq!(skills[1].skill, "electrical");
        assert_eq!(skills[2].skill, "painting");
        // carpentry seen before masonry and welding at count 1
        assert_eq!(skills[3].skill, "carpentry");
        assert_eq!(skills[4].skill, "masonry");
    }
}
