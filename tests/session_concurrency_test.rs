use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use assessment_backend::database::session_store::CandidateProfile;
use assessment_backend::services::session_service::SessionService;

const EXAM_DURATION_MINUTES: i64 = 30;

async fn setup() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&database_url)
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    Some(pool)
}

fn profile(prefix: &str) -> CandidateProfile {
    CandidateProfile {
        id: format!("{}-{}@example.com", prefix, Uuid::new_v4()),
        name: Some("Load Tester".to_string()),
        phone: None,
        photo_url: None,
    }
}

async fn backdate_start(pool: &PgPool, candidate_id: &str, seconds: i64) {
    sqlx::query(
        "UPDATE exam_sessions SET started_at = NOW() - make_interval(secs => $2) WHERE candidate_id = $1",
    )
    .bind(candidate_id)
    .bind(seconds as f64)
    .execute(pool)
    .await
    .expect("backdate");
}

#[tokio::test]
async fn concurrent_starts_yield_exactly_one_start_time() {
    let Some(pool) = setup().await else { return };
    let service = SessionService::new(pool.clone(), EXAM_DURATION_MINUTES);
    let candidate = profile("p1");

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        let candidate = candidate.clone();
        handles.push(tokio::spawn(
            async move { service.start(&candidate).await },
        ));
    }

    let mut observed = Vec::new();
    for handle in handles {
        let session = handle.await.unwrap().expect("start");
        observed.push(session.started_at.expect("armed"));
    }

    let first = observed[0];
    assert!(
        observed.iter().all(|t| *t == first),
        "all racers must observe the same start: {:?}",
        observed
    );

    let stored = service.get_by_candidate(&candidate.id).await.expect("read");
    assert_eq!(stored.started_at, Some(first));
}

#[tokio::test]
async fn racing_end_and_complete_converge_on_one_record() {
    let Some(pool) = setup().await else { return };
    let service = SessionService::new(pool.clone(), EXAM_DURATION_MINUTES);
    let candidate = profile("p2");

    service.start(&candidate).await.expect("start");

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        let candidate_id = candidate.id.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                service.end(&candidate_id).await
            } else {
                service.complete(&candidate_id).await
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("end/complete");
    }

    let stored = service.get_by_candidate(&candidate.id).await.expect("read");
    let started_at = stored.started_at.expect("started");
    let ended_at = stored.ended_at.expect("ended");
    let completion = stored.completion_seconds.expect("completed");

    assert!(ended_at >= started_at);
    assert!(completion >= 0);
    assert_eq!(
        completion as i64,
        (ended_at - started_at).num_seconds().max(0)
    );

    // Every straggler sees the converged values.
    let replay_end = service.end(&candidate.id).await.expect("replay end");
    assert_eq!(replay_end.ended_at, Some(ended_at));
    let replay_complete = service.complete(&candidate.id).await.expect("replay complete");
    assert_eq!(replay_complete.completion_seconds, Some(completion));
}

#[tokio::test]
async fn recent_start_is_kept_but_stale_start_rearms() {
    let Some(pool) = setup().await else { return };
    let service = SessionService::new(pool.clone(), EXAM_DURATION_MINUTES);
    let candidate = profile("p3");

    let first = service.start(&candidate).await.expect("start");
    let first_started = first.started_at.expect("armed");

    // A recent start survives a repeat call untouched.
    let repeat = service.start(&candidate).await.expect("repeat");
    assert_eq!(repeat.started_at, Some(first_started));

    // Push the start outside the window with no completion recorded: the
    // next start re-arms instead of locking the candidate out.
    backdate_start(&pool, &candidate.id, 2 * 60 * 60).await;
    let rearmed = service.start(&candidate).await.expect("rearm");
    let rearmed_started = rearmed.started_at.expect("armed");
    assert!(rearmed_started > first_started);
    assert!(
        (chrono::Utc::now() - rearmed_started).num_seconds() < 60,
        "re-armed start should be fresh"
    );
}

#[tokio::test]
async fn completed_session_never_rearms() {
    let Some(pool) = setup().await else { return };
    let service = SessionService::new(pool.clone(), EXAM_DURATION_MINUTES);
    let candidate = profile("p4");

    service.start(&candidate).await.expect("start");
    service.end(&candidate.id).await.expect("end");
    service.complete(&candidate.id).await.expect("complete");

    // Even far past the window, a scored attempt is final.
    backdate_start(&pool, &candidate.id, 3 * 60 * 60).await;
    let stored = service.get_by_candidate(&candidate.id).await.expect("read");
    let backdated = stored.started_at.expect("started");

    let retry = service.start(&candidate).await.expect("retry");
    assert_eq!(retry.started_at, Some(backdated));
    assert_eq!(retry.completion_seconds, stored.completion_seconds);
}

#[tokio::test]
async fn late_end_after_the_window_still_completes() {
    let Some(pool) = setup().await else { return };
    let service = SessionService::new(pool.clone(), EXAM_DURATION_MINUTES);
    let candidate = profile("p5");

    service.start(&candidate).await.expect("start");
    // Crash/resume: the client comes back 1900s in, past the 1800s window.
    backdate_start(&pool, &candidate.id, 1900).await;

    service.end(&candidate.id).await.expect("end");
    let completed = service.complete(&candidate.id).await.expect("complete");

    let completion = completed.completion_seconds.expect("completed") as i64;
    assert!(
        (1900..1910).contains(&completion),
        "elapsed time is recorded, not rejected: {}",
        completion
    );
}

#[tokio::test]
async fn stale_rearm_clears_a_dangling_end() {
    let Some(pool) = setup().await else { return };
    let service = SessionService::new(pool.clone(), EXAM_DURATION_MINUTES);
    let candidate = profile("p6");

    service.start(&candidate).await.expect("start");
    service.end(&candidate.id).await.expect("end");
    backdate_start(&pool, &candidate.id, 2 * 60 * 60).await;

    // Ended but never completed, window long gone: re-arm must not leave an
    // ended_at older than the new started_at behind.
    let rearmed = service.start(&candidate).await.expect("rearm");
    assert!(rearmed.ended_at.is_none());
    assert!(rearmed.completion_seconds.is_none());

    service.end(&candidate.id).await.expect("end again");
    let stored = service.get_by_candidate(&candidate.id).await.expect("read");
    assert!(stored.ended_at.unwrap() >= stored.started_at.unwrap());
}
