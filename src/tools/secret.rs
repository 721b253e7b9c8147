use core::{
    fmt::Debug,
    ops::{Add, AddAssign, Neg},
};

use secrecy::{ExposeSecret, ExposeSecretMut, SecretBox};
use zeroize::Zeroize;

/// A helper wrapper for private keys, chain codes and other intermediate secrets.
///
/// The value lives on the heap and is zeroized when the wrapper is dropped,
/// which covers early returns and unwinding as well as the normal exit.
/// On top of `secrecy::SecretBox` functionality, it provides:
/// - Safe `Clone` implementation (without needing to impl `CloneableSecret`)
/// - Safe `Debug` implementation
pub struct Secret<T: Zeroize>(SecretBox<T>);

impl<T> Secret<T>
where
    T: Zeroize,
{
    /// Borrows the secret value.
    pub fn expose_secret(&self) -> &T {
        self.0.expose_secret()
    }

    /// Mutably borrows the secret value.
    pub fn expose_secret_mut(&mut self) -> &mut T {
        self.0.expose_secret_mut()
    }
}

impl<T> Secret<T>
where
    T: Zeroize + Clone,
{
    /// Creates the secret in place, so that no stack copy outlives this call.
    pub fn init_with(ctr: impl FnOnce() -> T) -> Self {
        Self(SecretBox::init_with(ctr))
    }

    /// Same as [`Secret::init_with`], for a fallible constructor.
    pub fn try_init_with<E>(ctr: impl FnOnce() -> Result<T, E>) -> Result<Self, E> {
        Ok(Self(SecretBox::try_init_with(ctr)?))
    }
}

impl<T> Secret<T>
where
    T: Zeroize + Clone + Default,
{
    /// Creates a default-initialized secret and fills it through a mutable reference.
    pub fn init_with_mut(ctr: impl FnOnce(&mut T)) -> Self {
        Self(SecretBox::init_with_mut(ctr))
    }
}

impl<T> Clone for Secret<T>
where
    T: Zeroize + Clone,
{
    fn clone(&self) -> Self {
        Self::init_with(|| self.0.expose_secret().clone())
    }
}

impl<T> Debug for Secret<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Secret<{}>(...)", core::any::type_name::<T>())
    }
}

// Addition

impl<'a, T: Zeroize + AddAssign<&'a T>> AddAssign<&'a T> for Secret<T> {
    fn add_assign(&mut self, other: &'a T) {
        self.expose_secret_mut().add_assign(other);
    }
}

impl<'a, T: Zeroize + AddAssign<&'a T>> AddAssign<&'a Secret<T>> for Secret<T> {
    fn add_assign(&mut self, other: &'a Secret<T>) {
        self.add_assign(other.expose_secret());
    }
}

impl<'a, T: Zeroize + AddAssign<&'a T>> Add<&'a T> for Secret<T> {
    type Output = Secret<T>;

    fn add(mut self, other: &'a T) -> Self::Output {
        self += other;
        self
    }
}

// Negation

impl<T: Zeroize + Clone + Neg<Output = T>> Neg for &Secret<T> {
    type Output = Secret<T>;
    fn neg(self) -> Self::Output {
        Secret::init_with(|| self.expose_secret().clone().neg())
    }
}

impl<T: Zeroize + Clone + Neg<Output = T>> Neg for Secret<T> {
    type Output = Secret<T>;
    fn neg(self) -> Self::Output {
        -&self
    }
}
