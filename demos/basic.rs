use rotor::{channel, clear};
use std::thread;

fn main() {
    let (mut tx, mut rx) = channel::<u32>(16);

    // Overfilling reports failure instead of blocking or overwriting.
    for i in 0..20 {
        match tx.push(i) {
            Ok(()) => println!("pushed {i}"),
            Err(rejected) => println!("full, {rejected} handed back"),
        }
    }
    while let Some(value) = rx.pop() {
        println!("popped {value}");
    }

    // Batches are best-effort: short writes and reads are normal.
    let values: Vec<u32> = (0..20).collect();
    let written = tx.push_slice(&values);
    println!("batch wrote {written}/{}", values.len());

    let mut dst = vec![0u32; 30];
    let read = rx.pop_slice(&mut dst);
    println!("batch read {read}/{}", dst.len());

    // Two-thread pipeline with yield-based backoff on both sides.
    let (mut tx2, mut rx2) = channel::<u32>(128);
    let producer = thread::spawn(move || {
        for i in 0..1000 {
            while tx2.push(i).is_err() {
                thread::yield_now();
            }
        }
        tx2
    });
    let consumer = thread::spawn(move || {
        let mut count = 0;
        while count < 1000 {
            if let Some(value) = rx2.pop() {
                if value % 100 == 0 {
                    println!("consumer at {value}");
                }
                count += 1;
            } else {
                thread::yield_now();
            }
        }
        rx2
    });
    let mut tx2 = producer.join().unwrap();
    let mut rx2 = consumer.join().unwrap();

    // Both handles are back on one thread, so the channel is provably
    // quiescent and can be cleared.
    tx2.push_slice(&values);
    println!("before clear: len {}", tx2.len());
    clear(&mut tx2, &mut rx2);
    println!("after clear: len {}, empty {}", rx2.len(), rx2.is_empty());
}
