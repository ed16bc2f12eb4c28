//! Fixed daily delivery schedule.
//!
//! Two independent tasks fire once per day at fixed civil times in the
//! schedule timezone and run the same pipelines the commands use, but
//! against the configured recipient chat. Missed triggers are not
//! replayed and a failed run never stops the loop or the other job.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::error::BotError;
use crate::services::pipeline_service;
use crate::AppContext;

/// Civil timezone of the schedule.
pub const SCHEDULE_TZ: Tz = chrono_tz::Asia::Taipei;

/// Spawn the two daily jobs: the index update at 08:00 and the component
/// update at 08:01, both targeting the configured chat.
pub fn spawn_daily_jobs(ctx: Arc<AppContext>) {
    spawn_daily_jobs_at(ctx, (8, 0, 0), (8, 1, 0));
}

fn spawn_daily_jobs_at(
    ctx: Arc<AppContext>,
    feargreed_at: (u32, u32, u32),
    components_at: (u32, u32, u32),
) {
    let chat_id = ctx.config.chat_id;

    {
        let ctx = ctx.clone();
        tokio::spawn(run_daily("feargreed", feargreed_at, move || {
            let ctx = ctx.clone();
            async move { pipeline_service::run_feargreed(&ctx, chat_id).await }
        }));
    }
    {
        let ctx = ctx.clone();
        tokio::spawn(run_daily("components", components_at, move || {
            let ctx = ctx.clone();
            async move { pipeline_service::run_components(&ctx, chat_id).await }
        }));
    }
}

async fn run_daily<F, Fut>(name: &'static str, at: (u32, u32, u32), job: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), BotError>> + Send,
{
    loop {
        let now = Utc::now().with_timezone(&SCHEDULE_TZ);
        let next = next_occurrence(now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(job = name, next_run = %next, "Scheduled daily job");

        tokio::time::sleep(wait).await;

        info!(job = name, "Running scheduled job");
        if let Err(e) = job().await {
            // Logged only: the job fires again tomorrow and the other
            // job is unaffected.
            error!(job = name, "Scheduled job failed: {}", e);
        }
    }
}

/// Next instant strictly after `after` whose civil time in the schedule
/// timezone is `at` (hour, minute, second). A local time skipped by a
/// DST transition rolls forward to the next day; an ambiguous one takes
/// the earlier offset.
fn next_occurrence(after: DateTime<Tz>, at: (u32, u32, u32)) -> DateTime<Tz> {
    let (hour, minute, second) = at;
    let mut date = after.date_naive();

    // Two iterations suffice outside DST gaps; three covers them.
    for _ in 0..3 {
        if let Some(naive) = date.and_hms_opt(hour, minute, second) {
            match SCHEDULE_TZ.from_local_datetime(&naive) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) if dt > after => {
                    return dt;
                }
                _ => {}
            }
        }
        date = match date.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }

    after + Duration::days(1)
}
