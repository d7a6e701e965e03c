
use fetchq::scheduler::{Job, JobStatus, JobStore};
use serde_json::Value;
use test_harness::test_scheduler;

#[test]
fn test_job_creation() {
    let job = Job::new(0, "http://example.com/");
    assert_eq!(job.status(), JobStatus::New);
    assert_eq!(job.url(), "http://example.com/");
    assert_eq!(job.response_status_code(), 0);
    assert_eq!(job.response_content_length(), 0);
    assert_eq!(job.response_body(), "");
}

#[test]
fn test_job_lifecycle_completed() {
    let mut job = Job::new(1, "http://example.com/");
    job.start().unwrap();
    assert_eq!(job.status(), JobStatus::Pending);

    let status = job
        .record_response(200, 11, "hello world".to_string())
        .unwrap();
    assert_eq!(status, JobStatus::Completed);
    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.response_status_code(), 200);
    assert_eq!(job.response_content_length(), 11);
    assert_eq!(job.response_body(), "hello world");
    assert!(job.completed_at().unwrap() >= job.created_at());
}

#[test]
fn test_job_lifecycle_error_response() {
    let mut job = Job::new(1, "http://example.com/missing");
    job.start().unwrap();

    let status = job.record_response(404, 9, "not found".to_string()).unwrap();
    assert_eq!(status, JobStatus::Error);
    assert_eq!(job.response_status_code(), 404);
    assert_eq!(job.response_body(), "not found");
}

#[test]
fn test_job_lifecycle_failure_keeps_defaults() {
    let mut job = Job::new(1, "http://unreachable.invalid/");
    job.start().unwrap();
    job.record_failure().unwrap();

    assert_eq!(job.status(), JobStatus::Error);
    assert_eq!(job.response_status_code(), 0);
    assert_eq!(job.response_content_length(), 0);
    assert_eq!(job.response_body(), "");
}

#[test]
fn test_job_never_moves_backwards() {
    let mut job = Job::new(1, "http://example.com/");
    job.start().unwrap();
    job.record_response(200, 0, String::new()).unwrap();

    assert!(job.start().is_err());
    assert!(job.record_failure().is_err());
    assert!(job.record_response(500, 0, String::new()).is_err());
    assert_eq!(job.status(), JobStatus::Completed);
    assert_eq!(job.response_status_code(), 200);
}

#[test]
fn test_job_serialization_omits_body() {
    let mut job = Job::new(4, "http://example.com/");
    job.start().unwrap();
    job.record_response(200, 5, "hello".to_string()).unwrap();

    let value = serde_json::to_value(&job).unwrap();
    assert_eq!(value["id"], 4);
    assert_eq!(value["url"], "http://example.com/");
    assert_eq!(value["status"], "Completed");
    assert_eq!(value["response_status_code"], 200);
    assert_eq!(value["response_content_length"], 5);
    assert!(value.get("response_body").is_none());
    assert!(!serde_json::to_string(&job).unwrap().contains("\"hello\""));
}

#[test]
fn test_new_job_serializes_with_null_completion() {
    let job = Job::new(0, "http://example.com/");
    let value = serde_json::to_value(&job).unwrap();
    assert_eq!(value["status"], "New");
    assert_eq!(value["completed_at"], Value::Null);
}

#[test]
fn test_store_operations() {
    let mut store = JobStore::new();
    assert!(store.is_empty());

    let id1 = store.create("http://example.com/1");
    let id2 = store.create("http://example.com/2");
    assert!(id2 > id1);
    assert_eq!(store.len(), 2);

    let retrieved = store.get(id1).unwrap();
    assert_eq!(retrieved.url(), "http://example.com/1");
    assert_eq!(retrieved.status(), JobStatus::New);

    store.get_mut(id2).unwrap().start().unwrap();
    assert_eq!(store.get(id2).unwrap().status(), JobStatus::Pending);

    let urls: Vec<&str> = store.iter().map(Job::url).collect();
    assert_eq!(urls, vec!["http://example.com/1", "http://example.com/2"]);
}

#[test]
fn test_store_unknown_id_is_not_found() {
    let mut store = JobStore::new();
    for i in 0..3 {
        store.create(format!("http://example.com/{i}"));
    }
    assert!(store.get(3).is_none());
    assert!(store.get(1_000).is_none());
}

#[test]
fn test_store_recent_window() {
    let mut store = JobStore::new();
    assert!(store.recent(10).is_empty());

    for i in 0..15 {
        store.create(format!("http://example.com/{i}"));
    }

    let recent = store.recent(10);
    assert_eq!(recent.len(), 10);
    let ids: Vec<u64> = recent.iter().map(Job::id).collect();
    assert_eq!(ids, (5..15).collect::<Vec<u64>>());
    assert_eq!(recent[0].url(), "http://example.com/5");
}

#[tokio::test]
async fn test_handle_submit_stores_before_worker_runs() {
    let scheduler = test_scheduler(4);

    let id = scheduler.submit("http://example.com/").await.unwrap();
    let job = scheduler.job(id).await.unwrap();
    assert_eq!(job.status(), JobStatus::New);
    assert_eq!(scheduler.queue().len(), 1);
    assert_eq!(scheduler.queue().take().await, Some(id));

    // Taking from the queue leaves the store entry in place
    assert!(scheduler.job(id).await.is_some());
    assert_eq!(scheduler.recent(10).await.len(), 1);
}

#[tokio::test]
async fn test_handle_ids_unique_across_submissions() {
    let scheduler = test_scheduler(8);
    let mut ids = Vec::new();
    for i in 0..8 {
        ids.push(scheduler.submit(format!("http://example.com/{i}")).await.unwrap());
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}
