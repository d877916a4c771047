//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Integration tests for concurrent first use.
//!
//! These tests verify that classification and codec caches settle on a
//! single outcome when many threads touch a type at the same time.

use std::sync::{Arc, Barrier};
use std::thread;

use lzpack::codec::SelectedCodec;
use lzpack::resolver::Resolver;
use lzpack::switcher;
use lzpack::Codec;

const THREADS: usize = 16;

#[derive(Debug, Clone, PartialEq, Codec)]
#[lzpack(union)]
enum Signal {
    #[lzpack(tag = 1)]
    Up(u8),
    #[lzpack(tag = 2)]
    Down,
}

#[derive(Debug, Clone, PartialEq, Codec)]
struct Frame {
    seq: u64,
    signals: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq, Codec)]
struct Plain {
    a: u32,
    b: String,
}

fn run_concurrently<F, R>(f: F) -> Vec<R>
where
    F: Fn() -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    let barrier = Arc::new(Barrier::new(THREADS));
    let f = Arc::new(f);
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let f = Arc::clone(&f);
            thread::spawn(move || {
                barrier.wait();
                f()
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn test_concurrent_classification_agrees() {
    let resolver = Arc::new(Resolver::new());
    let shared = Arc::clone(&resolver);
    let results = run_concurrently(move || shared.is_union_type::<Frame>().unwrap());
    assert!(results.iter().all(|&is_union| is_union));
    assert_eq!(resolver.len(), 1);
}

#[test]
fn test_concurrent_codec_selection() {
    let codecs = run_concurrently(|| SelectedCodec::<Frame>::for_type().unwrap());
    assert!(codecs.iter().all(SelectedCodec::is_union));

    let codecs = run_concurrently(|| SelectedCodec::<Plain>::for_type().unwrap());
    assert!(codecs.iter().all(|codec| !codec.is_union()));
}

#[test]
fn test_concurrent_round_trips() {
    let results = run_concurrently(|| {
        let frame = Frame {
            seq: 42,
            signals: vec![Signal::Up(1), Signal::Down],
        };
        let bytes = switcher::serialize(&frame).unwrap();
        switcher::deserialize::<Frame>(&bytes).unwrap() == frame
    });
    assert!(results.into_iter().all(|ok| ok));
}
