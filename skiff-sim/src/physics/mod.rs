mod collision;
mod ship;

#[cfg(test)]
mod tests;

pub use ship::Ship;
