//! Caller-supplied reauthentication logic.
//!
//! Both operations run synchronously on the thread that resolves the
//! challenge. `AuthenticatingClient` runs them on tokio's blocking pool, so
//! they may block on network I/O (e.g. a login round trip through
//! `Handle::block_on`). Anything that must happen on a single-threaded
//! resource, such as a UI loop, has to be re-dispatched by the callback.

use std::sync::Arc;

use crate::reauth::lineage::ChallengeResponse;
use crate::reauth::request::Request;
use crate::reauth::route::Route;

/// Error raised by a callback. Passed through the coordinator untouched.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// The two capabilities the coordinator delegates to.
pub trait Callback: Send + Sync {
    /// A 401 was received and the retry bound has not been reached.
    ///
    /// Return the request to retry with, or `None` if reauthentication is not
    /// possible.
    fn reauthenticate(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<Option<Request>, CallbackError>;

    /// The retry bound was reached. Good place to clear credentials and ask
    /// the user to sign in again.
    fn unable_to_authenticate(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<(), CallbackError>;
}

impl<C: Callback + ?Sized> Callback for Arc<C> {
    fn reauthenticate(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<Option<Request>, CallbackError> {
        (**self).reauthenticate(route, response)
    }

    fn unable_to_authenticate(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<(), CallbackError> {
        (**self).unable_to_authenticate(route, response)
    }
}

/// A [`Callback`] made of two closures.
pub struct FnCallback<R, U> {
    reauthenticate: R,
    unable_to_authenticate: U,
}

impl<R, U> FnCallback<R, U>
where
    R: Fn(&Route, &ChallengeResponse) -> Result<Option<Request>, CallbackError> + Send + Sync,
    U: Fn(&Route, &ChallengeResponse) -> Result<(), CallbackError> + Send + Sync,
{
    pub fn new(reauthenticate: R, unable_to_authenticate: U) -> Self {
        Self {
            reauthenticate,
            unable_to_authenticate,
        }
    }
}

impl<R, U> Callback for FnCallback<R, U>
where
    R: Fn(&Route, &ChallengeResponse) -> Result<Option<Request>, CallbackError> + Send + Sync,
    U: Fn(&Route, &ChallengeResponse) -> Result<(), CallbackError> + Send + Sync,
{
    fn reauthenticate(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<Option<Request>, CallbackError> {
        (self.reauthenticate)(route, response)
    }

    fn unable_to_authenticate(
        &self,
        route: &Route,
        response: &ChallengeResponse,
    ) -> Result<(), CallbackError> {
        (self.unable_to_authenticate)(route, response)
    }
}
