use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::enrollment::Enrollment;
use crate::types::{PaymentFrequency, PaymentPlan};

/// wall-clock time stamped onto every generated date; must match the
/// billing cron's run time exactly
const ANCHOR_HOUR: u32 = 9;
const ANCHOR_MINUTE: u32 = 45;

/// compute the next scheduled automatic-payment date, or None when the
/// enrollment has no schedulable installment
pub fn next_installment_date(enrollment: &Enrollment, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if enrollment.payment_plan == PaymentPlan::Full {
        return None;
    }
    if !enrollment.outstanding_balance().is_positive() {
        return None;
    }

    match enrollment.payment_frequency {
        PaymentFrequency::Monthly => next_monthly(enrollment, now),
        PaymentFrequency::Weekly => next_fixed_interval(enrollment, now, 7),
        PaymentFrequency::BiWeekly => next_fixed_interval(enrollment, now, 14),
    }
}

/// monthly cadence: billing day is the explicit override, else the
/// day-of-month of the cadence start; clamped to each month's actual length
fn next_monthly(enrollment: &Enrollment, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let billing_day = enrollment
        .payment_day
        .map(u32::from)
        .or_else(|| enrollment.payment_start.map(|start| start.day()))?;
    let anchor = anchor_time()?;

    let mut year = now.year();
    let mut month = now.month();
    let mut candidate = clamped_date(year, month, billing_day)?.and_time(anchor);

    // loop rather than closed-form arithmetic: a billing day near month-end
    // clamps differently as month lengths change
    while candidate < now || before_start(enrollment, candidate) {
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
        candidate = clamped_date(year, month, billing_day)?.and_time(anchor);
    }

    Some(candidate)
}

/// weekly and bi-weekly cadences step in exact-day increments from the
/// cadence start, preserving its day-of-week
fn next_fixed_interval(
    enrollment: &Enrollment,
    now: NaiveDateTime,
    step_days: i64,
) -> Option<NaiveDateTime> {
    let start = enrollment.payment_start?;
    let anchor = anchor_time()?;

    let mut candidate = start.date().and_time(anchor);
    while candidate < now || candidate < start {
        candidate += Duration::days(step_days);
    }

    Some(candidate)
}

fn before_start(enrollment: &Enrollment, candidate: NaiveDateTime) -> bool {
    enrollment
        .payment_start
        .map_or(false, |start| candidate < start)
}

fn anchor_time() -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(ANCHOR_HOUR, ANCHOR_MINUTE, 0)
}

fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::enrollment::Transaction;
    use crate::types::TransactionType;
    use uuid::Uuid;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn enrollment(
        frequency: PaymentFrequency,
        payment_day: Option<u8>,
        payment_start: Option<NaiveDateTime>,
    ) -> Enrollment {
        Enrollment {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            cost: Money::from_major(1000),
            discount: Money::from_major(200),
            installment: Money::from_major(100),
            payment_plan: PaymentPlan::Accelerated,
            payment_frequency: frequency,
            payment_day,
            payment_start,
            transactions: Vec::new(),
            payment_methods: Vec::new(),
        }
    }

    fn pay(enrollment: &mut Enrollment, amount: Money) {
        enrollment.transactions.push(Transaction {
            id: Uuid::new_v4(),
            enrollment_id: enrollment.id,
            amount,
            attempted_amount: amount,
            extra_charge: false,
            transaction_type: TransactionType::Charge,
            voided: false,
            parent_id: None,
            posted_at: at(2024, 1, 15, 9, 45),
        });
    }

    #[test]
    fn test_full_plan_never_schedules() {
        let mut e = enrollment(PaymentFrequency::Monthly, Some(15), None);
        e.payment_plan = PaymentPlan::Full;
        assert_eq!(next_installment_date(&e, at(2024, 2, 20, 0, 0)), None);
    }

    #[test]
    fn test_settled_balance_never_schedules() {
        let mut e = enrollment(PaymentFrequency::Monthly, Some(15), None);
        pay(&mut e, Money::from_major(800));
        assert_eq!(next_installment_date(&e, at(2024, 2, 20, 0, 0)), None);

        // overpayment behaves the same
        pay(&mut e, Money::from_major(50));
        assert_eq!(next_installment_date(&e, at(2024, 2, 20, 0, 0)), None);
    }

    #[test]
    fn test_monthly_explicit_day() {
        let start = at(2024, 1, 15, 0, 0);
        let mut e = enrollment(PaymentFrequency::Monthly, Some(15), Some(start));
        pay(&mut e, Money::from_major(100));

        let next = next_installment_date(&e, at(2024, 2, 20, 0, 0)).unwrap();
        assert_eq!(next, at(2024, 3, 15, 9, 45));
    }

    #[test]
    fn test_monthly_day_falls_back_to_start() {
        let start = at(2024, 1, 9, 0, 0);
        let e = enrollment(PaymentFrequency::Monthly, None, Some(start));

        let next = next_installment_date(&e, at(2024, 3, 10, 0, 0)).unwrap();
        assert_eq!(next, at(2024, 4, 9, 9, 45));
    }

    #[test]
    fn test_monthly_without_day_or_start() {
        let e = enrollment(PaymentFrequency::Monthly, None, None);
        assert_eq!(next_installment_date(&e, at(2024, 2, 20, 0, 0)), None);
    }

    #[test]
    fn test_day_31_clamps_to_leap_february() {
        let start = at(2024, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::Monthly, Some(31), Some(start));

        // past 09:45 on jan 31, so january's candidate has already run
        let next = next_installment_date(&e, at(2024, 1, 31, 12, 0)).unwrap();
        assert_eq!(next, at(2024, 2, 29, 9, 45));
    }

    #[test]
    fn test_day_31_clamps_to_plain_february() {
        let start = at(2023, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::Monthly, Some(31), Some(start));

        let next = next_installment_date(&e, at(2023, 1, 31, 12, 0)).unwrap();
        assert_eq!(next, at(2023, 2, 28, 9, 45));
    }

    #[test]
    fn test_day_31_clamps_to_april_30() {
        let start = at(2024, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::Monthly, Some(31), Some(start));

        let next = next_installment_date(&e, at(2024, 4, 1, 0, 0)).unwrap();
        assert_eq!(next, at(2024, 4, 30, 9, 45));
    }

    #[test]
    fn test_monthly_candidate_not_before_start() {
        // start late in the year, now well before it
        let start = at(2024, 6, 20, 0, 0);
        let e = enrollment(PaymentFrequency::Monthly, Some(15), Some(start));

        let next = next_installment_date(&e, at(2024, 6, 1, 0, 0)).unwrap();
        assert_eq!(next, at(2024, 7, 15, 9, 45));
    }

    #[test]
    fn test_monthly_same_day_after_anchor_rolls_over() {
        let start = at(2024, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::Monthly, Some(15), Some(start));

        let next = next_installment_date(&e, at(2024, 2, 15, 10, 0)).unwrap();
        assert_eq!(next, at(2024, 3, 15, 9, 45));
    }

    #[test]
    fn test_weekly_preserves_day_of_week() {
        // 2024-01-15 is a monday
        let start = at(2024, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::Weekly, None, Some(start));

        let next = next_installment_date(&e, at(2024, 2, 1, 0, 0)).unwrap();
        assert_eq!(next, at(2024, 2, 5, 9, 45));
        assert_eq!(next.weekday(), start.weekday());

        let gap = next.date() - start.date();
        assert_eq!(gap.num_days() % 7, 0);
    }

    #[test]
    fn test_biweekly_steps_by_fourteen() {
        let start = at(2024, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::BiWeekly, None, Some(start));

        let next = next_installment_date(&e, at(2024, 2, 1, 0, 0)).unwrap();
        assert_eq!(next, at(2024, 2, 12, 9, 45));

        let gap = next.date() - start.date();
        assert_eq!(gap.num_days() % 14, 0);
    }

    #[test]
    fn test_weekly_gap_is_exact_multiple_as_now_advances() {
        let start = at(2024, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::Weekly, None, Some(start));

        let mut previous = None;
        for week in 0..8 {
            let now = start + Duration::days(7 * week + 3);
            let next = next_installment_date(&e, now).unwrap();
            assert_eq!(next.weekday(), start.weekday());
            if let Some(prev) = previous {
                let gap: Duration = next - prev;
                assert_eq!(gap.num_days() % 7, 0);
            }
            previous = Some(next);
        }
    }

    #[test]
    fn test_weekly_without_start() {
        let e = enrollment(PaymentFrequency::Weekly, None, None);
        assert_eq!(next_installment_date(&e, at(2024, 2, 1, 0, 0)), None);
    }

    #[test]
    fn test_weekly_seed_not_before_start_time() {
        // cadence start is later in the day than the anchor; the seed on the
        // start date must not be returned
        let start = at(2024, 1, 15, 18, 30);
        let e = enrollment(PaymentFrequency::Weekly, None, Some(start));

        let next = next_installment_date(&e, at(2024, 1, 10, 0, 0)).unwrap();
        assert_eq!(next, at(2024, 1, 22, 9, 45));
    }

    #[test]
    fn test_idempotent_for_same_inputs() {
        let start = at(2024, 1, 15, 0, 0);
        let e = enrollment(PaymentFrequency::Monthly, Some(31), Some(start));
        let now = at(2024, 2, 10, 0, 0);

        assert_eq!(
            next_installment_date(&e, now),
            next_installment_date(&e, now)
        );
    }

    #[test]
    fn test_days_in_month_table() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }
}
