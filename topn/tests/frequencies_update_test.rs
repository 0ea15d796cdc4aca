// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::ge;
use googletest::prelude::le;
use topn::error::ErrorKind;
use topn::frequencies::Frequency;
use topn::frequencies::MAX_FREQUENCY;
use topn::frequencies::TopNConfig;
use topn::frequencies::TopNSketch;
use topn::frequencies::saturating_add;

fn top(sketch: &TopNSketch, n: usize) -> Vec<(String, Frequency)> {
    sketch
        .top_n(n)
        .unwrap()
        .map(|item| (item.key().to_string(), item.frequency()))
        .collect()
}

fn pairs(sketch: &TopNSketch) -> Vec<(String, Frequency)> {
    let mut pairs: Vec<_> = sketch
        .iter()
        .map(|(key, frequency)| (key.to_string(), frequency))
        .collect();
    pairs.sort();
    pairs
}

fn owned(expected: &[(&str, Frequency)]) -> Vec<(String, Frequency)> {
    expected
        .iter()
        .map(|&(key, frequency)| (key.to_string(), frequency))
        .collect()
}

#[test]
fn test_top_two_of_three() {
    let mut sketch = TopNSketch::new(TopNConfig::with_max_counters(1000).unwrap());
    for (key, times) in [("a", 5), ("b", 3), ("c", 1)] {
        for _ in 0..times {
            sketch.increment(key, 1).unwrap();
        }
    }
    assert_eq!(top(&sketch, 2), owned(&[("a", 5), ("b", 3)]));
}

#[test]
fn test_merge_sums_shared_keys() {
    let config = TopNConfig::default();
    let mut left = TopNSketch::new(config);
    left.increment("x", 10).unwrap();
    left.increment("y", 10).unwrap();
    let mut right = TopNSketch::new(config);
    right.increment("x", 5).unwrap();

    left.merge(&right);
    assert_eq!(pairs(&left), owned(&[("x", 15), ("y", 10)]));
}

#[test]
fn test_top_n_above_max_counters() {
    let sketch = TopNSketch::new(TopNConfig::with_max_counters(10).unwrap());
    let err = sketch.top_n(11).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestExceedsConfiguredLimit);
}

#[test]
fn test_saturating_add_matches_exact_sum_when_in_range() {
    let values = [0, 1, 2, 1 << 32, MAX_FREQUENCY / 2, MAX_FREQUENCY - 1, MAX_FREQUENCY];
    for current in values {
        for delta in values.into_iter().chain([u64::MAX]) {
            let sum = saturating_add(current, delta);
            match current.checked_add(delta) {
                Some(exact) if exact <= MAX_FREQUENCY => assert_eq!(sum, exact),
                _ => assert_eq!(sum, MAX_FREQUENCY),
            }
        }
    }
}

#[test]
fn test_repeated_updates_never_exceed_max_frequency() {
    let mut sketch = TopNSketch::new(TopNConfig::default());
    for _ in 0..4 {
        sketch.update_with_count("hot", MAX_FREQUENCY / 3 + 1).unwrap();
    }
    assert_that!(sketch.estimate("hot"), eq(MAX_FREQUENCY));

    let copy = sketch.clone();
    sketch.merge(&copy);
    assert_that!(sketch.estimate("hot"), eq(MAX_FREQUENCY));
}

#[test]
fn test_key_too_long_leaves_sketch_unchanged() {
    let mut sketch = TopNSketch::new(TopNConfig::default());
    sketch.increment("kept", 2).unwrap();
    let before = pairs(&sketch);

    let err = sketch.increment(&"x".repeat(257), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyTooLong);
    let err = sketch.update(&"x".repeat(257)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyTooLong);
    assert_eq!(pairs(&sketch), before);

    sketch.increment(&"x".repeat(256), 1).unwrap();
    assert_eq!(sketch.len(), 2);
}

#[test]
fn test_prune_below_limit_is_noop() {
    let mut sketch = TopNSketch::new(TopNConfig::default());
    for i in 0..20u64 {
        sketch.increment(&format!("key-{i}"), i % 7).unwrap();
    }
    let before = pairs(&sketch);
    assert_eq!(sketch.prune(20, 1), 0);
    assert_eq!(sketch.prune(100, 1), 0);
    assert_eq!(pairs(&sketch), before);
}

#[test]
fn test_prune_keeps_the_heaviest() {
    let mut sketch = TopNSketch::new(TopNConfig::default());
    for i in 0..200u64 {
        // many ties
        sketch.increment(&format!("key-{i}"), (i * 37) % 23).unwrap();
    }
    let before = pairs(&sketch);

    assert_eq!(sketch.prune(150, 60), 140);
    assert_eq!(sketch.len(), 60);

    let kept = pairs(&sketch);
    let min_kept = kept.iter().map(|(_, f)| *f).min().unwrap();
    let evicted: Vec<_> = before.iter().filter(|pair| !kept.contains(pair)).collect();
    assert_eq!(evicted.len(), 140);
    for (_, frequency) in evicted {
        assert_that!(min_kept, ge(*frequency));
    }
    // retained entries keep their counts
    for pair in &kept {
        assert!(before.contains(pair));
    }
}

#[test]
fn test_merge_order_does_not_matter_before_pruning() {
    let config = TopNConfig::new(100, 3).unwrap();
    let build = |prefix: &str, n: u64| {
        let mut sketch = TopNSketch::new(config);
        for i in 0..n {
            sketch.update_with_count(&format!("{prefix}{i}"), i + 1).unwrap();
        }
        sketch
    };
    let a = build("a", 40);
    let b = build("b", 30);
    let c = build("c", 20);

    let mut abc = a.clone();
    abc.merge(&b);
    abc.merge(&c);
    let mut acb = a.clone();
    acb.merge(&c);
    acb.merge(&b);
    let mut cba = c.clone();
    cba.merge(&b);
    cba.merge(&a);

    assert_eq!(abc.len(), 90);
    assert_eq!(pairs(&abc), pairs(&acb));
    assert_eq!(pairs(&abc), pairs(&cba));
}

#[test]
fn test_merge_with_pruning_stays_bounded() {
    let config = TopNConfig::new(50, 2).unwrap();
    let mut dest = TopNSketch::new(config);
    for round in 0..10u64 {
        let mut partial = TopNSketch::new(config);
        for i in 0..100u64 {
            partial
                .update_with_count(&format!("r{round}-k{i}"), i)
                .unwrap();
        }
        partial.update_with_count("everywhere", 1000).unwrap();
        dest.merge(&partial);
        assert_that!(dest.len(), le(config.item_limit()));
    }
    // present in every partial with the top count, so never evicted
    assert_that!(dest.estimate("everywhere"), eq(10_000));

    dest.shrink_to_capacity();
    assert_that!(dest.len(), le(50));
    assert_eq!(top(&dest, 1), owned(&[("everywhere", 10_000)]));
}

#[test]
fn test_amortized_growth_is_bounded() {
    let config = TopNConfig::new(10, 3).unwrap();
    let mut sketch = TopNSketch::new(config);
    let mut peak = 0;
    for i in 0..10_000u64 {
        sketch.update(&format!("k{}", i % 997)).unwrap();
        peak = peak.max(sketch.len());
    }
    assert_that!(peak, le(config.item_limit()));
    assert_that!(sketch.len(), ge(1));
}

#[test]
fn test_top_n_ties_break_by_key() {
    let mut sketch = TopNSketch::new(TopNConfig::default());
    for key in ["pear", "apple", "fig", "kiwi"] {
        sketch.increment(key, 4).unwrap();
    }
    sketch.increment("plum", 9).unwrap();
    assert_eq!(
        top(&sketch, 3),
        owned(&[("plum", 9), ("apple", 4), ("fig", 4)])
    );
}

#[test]
fn test_top_n_is_recomputed_per_call() {
    let mut sketch = TopNSketch::new(TopNConfig::default());
    sketch.increment("a", 1).unwrap();
    let first = top(&sketch, 5);
    sketch.increment("b", 2).unwrap();
    let second = top(&sketch, 5);
    assert_eq!(first, owned(&[("a", 1)]));
    assert_eq!(second, owned(&[("b", 2), ("a", 1)]));
}
