use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tris::core::{GameSession, GameSnapshot, SessionConfig};
use tris::term::{FrameBuffer, GameView, Viewport};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn gravity_ticks_and_render_are_allocation_free_after_warmup() {
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    let config = SessionConfig {
        start_level: 9,
        ..Default::default()
    };
    let mut session = GameSession::new(config).unwrap();
    session.toggle_play();
    session.drain_events();
    let mut snap = GameSnapshot::default();

    // Warm-up: let the piece fall into view so every snapshot buffer has grown.
    for _ in 0..20 {
        session.update().unwrap();
        session.snapshot_into(&mut snap);
        view.render_into(&snap, viewport, &mut fb);
    }
    assert_eq!(snap.active.len(), 4);

    let allocs = with_alloc_counting(|| {
        // Five rows of gravity; nothing reaches the floor
        for _ in 0..25 {
            session.update().unwrap();
            session.snapshot_into(&mut snap);
            view.render_into(&snap, viewport, &mut fb);
            session.mark_rendered();
        }
    });

    assert_eq!(allocs, 0);
    assert_eq!(session.pieces_seen(), 1);
}
