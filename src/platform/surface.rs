// Decisions the WebCrypto backend makes about what it finds in the global
// scope. Kept free of JS types so they build (and are tested) natively.

/// Which global surface exposes the WebCrypto digest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubtleSurface {
    Subtle,
    WebkitSubtle,
    MsCrypto,
}

impl SubtleSurface {
    pub fn path(&self) -> (&'static str, &'static str) {
        match self {
            SubtleSurface::Subtle => ("crypto", "subtle"),
            SubtleSurface::WebkitSubtle => ("crypto", "webkitSubtle"),
            SubtleSurface::MsCrypto => ("msCrypto", "subtle"),
        }
    }
}

// `has(root, key)` reports whether `root.key` is present. msCrypto is only
// consulted when there is no `crypto` at all.
pub fn choose_surface(has_crypto: bool, has: impl Fn(&str, &str) -> bool) -> Option<SubtleSurface> {
    if has_crypto {
        [SubtleSurface::Subtle, SubtleSurface::WebkitSubtle]
            .into_iter()
            .find(|surface| {
                let (root, key) = surface.path();
                has(root, key)
            })
    } else {
        let (root, key) = SubtleSurface::MsCrypto.path();
        has(root, key).then_some(SubtleSurface::MsCrypto)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Convention {
    Promise,
    Operation,
}

// Anything with a callable `then` is awaited, everything else is a legacy
// CryptoOperation.
pub fn convention(then_is_function: bool) -> Convention {
    if then_is_function {
        Convention::Promise
    } else {
        Convention::Operation
    }
}
