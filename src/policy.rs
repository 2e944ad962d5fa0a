/// Ordering policy for keys. Must define a strict total order that is
/// consistent with the [`KeyEq`] policy of the same tree: if
/// `equal(a, b)` then neither `less(a, b)` nor `less(b, a)`.
pub trait KeyOrder<K: ?Sized> {
    fn less(&self, a: &K, b: &K) -> bool;
}

/// Equality policy for keys.
pub trait KeyEq<K: ?Sized> {
    fn equal(&self, a: &K, b: &K) -> bool;
}

/// Natural ordering and equality, from key's `Ord` and `Eq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<K> KeyOrder<K> for Natural
where
    K: Ord + ?Sized,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

impl<K> KeyEq<K> for Natural
where
    K: Eq + ?Sized,
{
    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

impl<K, F> KeyOrder<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

impl<K, F> KeyEq<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_natural() {
        assert!(KeyOrder::<i64>::less(&Natural, &1, &2));
        assert!(!KeyOrder::<i64>::less(&Natural, &2, &2));
        assert!(KeyEq::<str>::equal(&Natural, "abc", "abc"));
    }

    #[test]
    fn test_closure() {
        let rev = |a: &i64, b: &i64| a > b;
        assert!(KeyOrder::<i64>::less(&rev, &2, &1));
        assert!(!KeyOrder::<i64>::less(&rev, &1, &2));
    }
}
