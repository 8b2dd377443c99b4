use std::io::Read;

use futures::executor::LocalPool;
use multidigest::{Algorithm, DigestSelector};

// Prints the digest of stdin, e.g.
//  echo -n hello | cargo run --example digest -- SHA-256
fn main() -> std::io::Result<()> {
    let algorithm: Algorithm = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "SHA-256".to_string())
        .parse()
        .unwrap();

    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;

    let selector = DigestSelector::detect();
    println!("Using {:?}", selector.engine().unwrap().kind());

    let mut pool = LocalPool::new();
    selector
        .hash(&pool.spawner(), algorithm, &input, move |result| match result {
            Ok(digest) => println!("{algorithm} {digest}"),
            Err(err) => eprintln!("{err}"),
        })
        .unwrap();
    pool.run();

    Ok(())
}
