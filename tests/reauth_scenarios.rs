//! End-to-end reauthentication scenarios against a mock backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use authretry::reauth::{CallbackError, ChallengeResponse, Request, Route};
use authretry::{ClientError, Coordinator, CredentialInterceptor, FnCallback, RequestInterceptor};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use url::Url;

mod common;

/// Call counters plus the attempt count each callback observed.
#[derive(Default)]
struct Calls {
    reauth: AtomicUsize,
    unable: AtomicUsize,
    reauth_attempts: Mutex<Vec<usize>>,
    unable_attempts: Mutex<Vec<usize>>,
}

impl Calls {
    fn counts(&self) -> (usize, usize) {
        (
            self.reauth.load(Ordering::SeqCst),
            self.unable.load(Ordering::SeqCst),
        )
    }
}

/// Coordinator whose reauthenticate step is `reply`, with every call recorded.
fn recording_coordinator<F>(calls: Arc<Calls>, retry_bound: u32, reply: F) -> Coordinator
where
    F: Fn(&ChallengeResponse) -> Result<Option<Request>, CallbackError> + Send + Sync + 'static,
{
    let on_reauth = calls.clone();
    let on_unable = calls;
    let callback = FnCallback::new(
        move |_: &Route, response: &ChallengeResponse| {
            on_reauth.reauth.fetch_add(1, Ordering::SeqCst);
            on_reauth.reauth_attempts.lock().unwrap().push(response.attempt_count());
            reply(response)
        },
        move |_: &Route, response: &ChallengeResponse| {
            on_unable.unable.fetch_add(1, Ordering::SeqCst);
            on_unable.unable_attempts.lock().unwrap().push(response.attempt_count());
            Ok(())
        },
    );
    Coordinator::builder(callback)
        .retry_bound(retry_bound)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_reauthenticate_once_then_succeed() {
    let backend = common::start_scripted_backend(&[401, 200]).await;
    let calls = Arc::new(Calls::default());
    let coordinator = recording_coordinator(calls.clone(), 3, |response| {
        let request = response.request().clone().with_header(
            HeaderName::from_static("hi"),
            HeaderValue::from_static("hi"),
        );
        Ok(Some(request))
    });
    let client = common::client_for(coordinator);

    let res = client.get(&backend.url("/resource")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(backend.hits(), 2);
    let seen = backend.seen();
    assert!(seen[0].get("hi").is_none());
    assert_eq!(seen[1].get("hi").unwrap(), "hi");
    assert_eq!(calls.counts(), (1, 0));
}

#[tokio::test]
async fn test_exhaust_retries() {
    let backend = common::start_scripted_backend(&[401, 401, 401]).await;
    let calls = Arc::new(Calls::default());
    let coordinator =
        recording_coordinator(calls.clone(), 3, |response| Ok(Some(response.request().clone())));
    let client = common::client_for(coordinator);

    let res = client.get(&backend.url("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.hits(), 3, "exactly three attempts");
    assert_eq!(calls.counts(), (2, 1));
    assert_eq!(*calls.reauth_attempts.lock().unwrap(), vec![1, 2]);
    assert_eq!(*calls.unable_attempts.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn test_ignored_call_is_not_retried() {
    let backend = common::start_scripted_backend(&[401]).await;
    let calls = Arc::new(Calls::default());
    let coordinator = recording_coordinator(calls.clone(), 3, |_| {
        Err("reauthenticate must not run for ignored calls".into())
    });
    let ignore = coordinator.ignore_header().clone();
    let client = common::client_for(coordinator);

    let request = Request::get(Url::parse(&backend.url("/login")).unwrap())
        .with_header(ignore, HeaderValue::from_static("true"));
    let res = client.execute(request).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.hits(), 1);
    assert_eq!(calls.counts(), (0, 0));
}

#[tokio::test]
async fn test_bound_of_one_gives_up_on_first_challenge() {
    let backend = common::start_scripted_backend(&[401, 200]).await;
    let calls = Arc::new(Calls::default());
    let coordinator =
        recording_coordinator(calls.clone(), 1, |response| Ok(Some(response.request().clone())));
    let client = common::client_for(coordinator);

    let res = client.get(&backend.url("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.hits(), 1);
    assert_eq!(calls.counts(), (0, 1));
}

#[tokio::test]
async fn test_declined_returns_challenge_without_terminal_callback() {
    let backend = common::start_scripted_backend(&[401, 200]).await;
    let calls = Arc::new(Calls::default());
    let coordinator = recording_coordinator(calls.clone(), 3, |_| Ok(None));
    let client = common::client_for(coordinator);

    let res = client.get(&backend.url("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.text().await.unwrap(), "status 401");
    assert_eq!(backend.hits(), 1);
    assert_eq!(calls.counts(), (1, 0));
}

#[tokio::test]
async fn test_declined_with_notification() {
    let backend = common::start_scripted_backend(&[401]).await;
    let unable = Arc::new(AtomicUsize::new(0));
    let u = unable.clone();
    let coordinator = Coordinator::builder(FnCallback::new(
        |_: &Route, _: &ChallengeResponse| Ok(None),
        move |_: &Route, _: &ChallengeResponse| {
            u.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    ))
    .notify_on_decline(true)
    .build()
    .unwrap();
    let client = common::client_for(coordinator);

    let res = client.get(&backend.url("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unable.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_callback_error_surfaces_to_caller() {
    let backend = common::start_scripted_backend(&[401, 200]).await;
    let calls = Arc::new(Calls::default());
    let coordinator = recording_coordinator(calls.clone(), 3, |_| Err("login endpoint down".into()));
    let client = common::client_for(coordinator);

    let err = client.get(&backend.url("/")).await.unwrap_err();

    match err {
        ClientError::Callback(source) => assert_eq!(source.to_string(), "login endpoint down"),
        other => panic!("expected callback error, got {other}"),
    }
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_success_never_consults_coordinator() {
    let backend = common::start_scripted_backend(&[200]).await;
    let calls = Arc::new(Calls::default());
    let coordinator = recording_coordinator(calls.clone(), 3, |_| Ok(None));
    let client = common::client_for(coordinator);

    let res = client.get(&backend.url("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(calls.counts(), (0, 0));
}

#[tokio::test]
async fn test_credential_is_reused_after_reauthentication() {
    let backend = common::start_guarded_backend("authorization", "Bearer token-1").await;
    let credentials = CredentialInterceptor::new(AUTHORIZATION);
    let calls = Arc::new(Calls::default());

    let slot = credentials.clone();
    let coordinator = recording_coordinator(calls.clone(), 3, move |response| {
        // Stands in for a login round trip.
        slot.set(HeaderValue::from_static("Bearer token-1"));
        let mut request = response.request().clone();
        slot.intercept(&mut request);
        Ok(Some(request))
    });
    let client = common::client_for(coordinator).with_interceptor(credentials.clone());

    let first = client.get(&backend.url("/resource")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.text().await.unwrap(), "resource");
    assert_eq!(backend.hits(), 2);

    let second = client.get(&backend.url("/resource")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(backend.hits(), 3, "interceptor attached the stored credential");
    assert_eq!(calls.counts(), (1, 0));
}

#[tokio::test]
async fn test_terminal_callback_can_clear_credential() {
    let backend = common::start_scripted_backend(&[401, 401]).await;
    let credentials = CredentialInterceptor::new(AUTHORIZATION);
    credentials.set(HeaderValue::from_static("Bearer stale"));

    let slot = credentials.clone();
    let coordinator = Coordinator::builder(FnCallback::new(
        |_: &Route, response: &ChallengeResponse| Ok(Some(response.request().clone())),
        move |_: &Route, _: &ChallengeResponse| {
            slot.clear();
            Ok(())
        },
    ))
    .retry_bound(2)
    .build()
    .unwrap();
    let client = common::client_for(coordinator).with_interceptor(credentials.clone());

    let res = client.get(&backend.url("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(backend.seen()[0].get("authorization").unwrap(), "Bearer stale");
    assert!(credentials.current().is_none());
}
