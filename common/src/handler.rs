//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// Fetchers of pages, HTTP endpoints and test doubles are all [`Handler`]s
/// of the arguments they are queried with.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

/// [`Handler`] backed by a function returning a [`Future`].
#[derive(Clone, Copy, Debug)]
pub struct FromFn<F>(F);

/// Wraps the provided function into a [`Handler`].
///
/// ```rust
/// # use common::handler::{self, Handler as _};
/// let double = handler::from_fn(|n: u32| async move {
///     Ok::<_, ()>(n * 2)
/// });
/// # drop(double.execute(2));
/// ```
#[must_use]
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<F, Fut, Args, T, E> Handler<Args> for FromFn<F>
where
    F: Fn(Args) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    type Ok = T;
    type Err = E;

    fn execute(&self, args: Args) -> impl Future<Output = Result<T, E>> {
        (self.0)(args)
    }
}
