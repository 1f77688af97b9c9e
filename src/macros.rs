/// Assert that the floating point numbers are equal within the given epsilon.
#[cfg(test)]
macro_rules! assert_float_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {{
        // Evaluate each expression once.
        let a = $a;
        let b = $b;
        let eps = $eps;
        let error = (a - b).abs();
        if error > eps {
            eprintln!("{:?}", $debug);
        }
        assert!(
            error <= eps,
            "Assertion failed: |({}) - ({})| = {:e} <= {:e}",
            a,
            b,
            error,
            eps
        );
    }};
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::macros::assert_float_eq!($a, $b, $eps, "")
    };
}

#[cfg(test)]
macro_rules! assert_f64_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {
        $crate::macros::assert_float_eq!($a as f64, $b as f64, $eps, $debug)
    };
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::macros::assert_float_eq!($a as f64, $b as f64, $eps)
    };
    ($a:expr, $b:expr) => {
        $crate::macros::assert_float_eq!($a as f64, $b as f64, 1e-12)
    };
}

/// Assert that two points are within `eps` of each other.
#[cfg(test)]
macro_rules! assert_point_eq {
    ($a:expr, $b:expr, $eps:expr) => {{
        let a: glam::DVec3 = $a;
        let b: glam::DVec3 = $b;
        let dist = a.distance(b);
        assert!(
            dist <= $eps,
            "Assertion failed: |{} - {}| = {:e} <= {:e}",
            a,
            b,
            dist,
            $eps
        );
    }};
    ($a:expr, $b:expr) => {
        $crate::macros::assert_point_eq!($a, $b, 1e-12)
    };
}

#[cfg(test)]
pub(crate) use assert_f64_eq;
#[cfg(test)]
pub(crate) use assert_float_eq;
#[cfg(test)]
pub(crate) use assert_point_eq;
