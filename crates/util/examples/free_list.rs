use keel_util::{collections::Stack, Error};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// A pool of equally sized byte buffers. Free buffer indices live on a fixed capacity stack so
/// acquiring and releasing never allocates.
struct Pool {
    buffers: Vec<Box<[u8]>>,
    free: Stack<usize>,
}

impl Pool {
    fn new(num_buffers: usize, buffer_size: usize) -> Result<Self, Error> {
        let buffers = (0..num_buffers)
            .map(|_| vec![0u8; buffer_size].into_boxed_slice())
            .collect();
        let mut free = Stack::new(num_buffers)?;
        for index in (0..num_buffers).rev() {
            free.push(index)?;
        }
        Ok(Self { buffers, free })
    }

    fn acquire(&mut self) -> Option<usize> {
        self.free.pop().ok()
    }

    fn release(&mut self, index: usize) -> Result<(), Error> {
        self.buffers[index].fill(0);
        self.free.push(index)
    }
}

// This example shows how to use a stack as the free list of a fixed size buffer pool.
fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("keel_util=trace,free_list=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let mut pool = Pool::new(4, 64)?;

    // Drain the pool.
    let mut held = Vec::new();
    while let Some(index) = pool.acquire() {
        pool.buffers[index][0] = index as u8 + 1;
        held.push(index);
    }
    tracing::info!(?held, "pool exhausted");

    // The free list never grows: releasing more than was acquired fails.
    for index in held.drain(..) {
        pool.release(index)?;
    }
    match pool.release(0) {
        Err(error) => tracing::info!(%error, "double release rejected"),
        Ok(()) => unreachable!(),
    }

    let next: Vec<_> = pool.free.iter().copied().collect();
    tracing::info!(?next, "free buffers, next first");
    Ok(())
}
