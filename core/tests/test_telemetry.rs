// Counters, stage timers and snapshots.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use snapframe_core::stream::framing::ChunkType;
    use snapframe_core::stream::{encode_all, FrameDecoder, FrameEncoder};
    use snapframe_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

// # ✅ 1. Counters

    #[test]
    fn counters_accumulate_by_frame_kind() {
        let mut c = TelemetryCounters::default();
        c.add_identifier(10);
        c.add_data(ChunkType::Compressed, 1000, 108, 100);
        c.add_data(ChunkType::Uncompressed, 50, 58, 50);
        c.add_skipped(7);

        assert_eq!(c.frames_identifier, 1);
        assert_eq!(c.frames_compressed, 1);
        assert_eq!(c.frames_uncompressed, 1);
        assert_eq!(c.frames_skipped, 1);
        assert_eq!(c.frames_data(), 2);
        assert_eq!(c.bytes_raw, 1050);
        assert_eq!(c.bytes_wire, 10 + 108 + 58 + 7);
        assert_eq!(c.bytes_overhead, 10 + 8 + 8 + 7);
    }

    #[test]
    fn counters_merge() {
        let mut a = TelemetryCounters::default();
        a.add_data(ChunkType::Compressed, 10, 12, 4);
        let mut b = TelemetryCounters::default();
        b.add_data(ChunkType::Uncompressed, 5, 13, 5);

        a += b.clone();
        assert_eq!(a.frames_data(), 2);
        assert_eq!(a.bytes_raw, 15);

        let mut c = TelemetryCounters::default();
        c.merge(&b);
        assert_eq!(c, b);
    }

// # ✅ 2. Timers

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Compress, Duration::from_millis(3));
        times.add(Stage::Compress, Duration::from_millis(2));
        times.add(Stage::Parse, Duration::from_millis(1));

        assert_eq!(times.get(Stage::Compress), Duration::from_millis(5));
        assert!((times.get_ms(Stage::Parse) - 1.0).abs() < 1e-9);
        assert!((times.get_us(Stage::Parse) - 1_000.0).abs() < 1e-6);
        assert_eq!(times.get(Stage::Decompress), Duration::ZERO);
        assert!(!times.contains(Stage::Split));
        assert_eq!(times.total(), Duration::from_millis(6));
        assert_eq!((&times).into_iter().count(), 2);
    }

    #[test]
    fn timer_charges_closure_to_stage() {
        let mut timer = TelemetryTimer::new();
        let out = timer.time(Stage::Split, || {
            std::thread::sleep(Duration::from_millis(2));
            42
        });
        assert_eq!(out, 42);
        assert!(timer.stage_times.get(Stage::Split) >= Duration::from_millis(2));

        timer.finish();
        let end = timer.end_time;
        timer.finish();
        assert_eq!(timer.end_time, end, "finish is idempotent");
    }

// # ✅ 3. Snapshots from the codec

    #[test]
    fn encoder_snapshot_reports_ratio_and_stages() {
        let data = vec![b'z'; 200_000];
        let mut enc = FrameEncoder::new();
        let mut wire = enc.feed(&data).unwrap();
        wire.extend(enc.finish().unwrap());

        let snap = enc.telemetry();
        assert_eq!(snap.counters.bytes_raw, 200_000);
        assert_eq!(snap.counters.bytes_wire, wire.len() as u64);
        assert!((snap.compression_ratio - wire.len() as f64 / 200_000.0).abs() < 1e-9);
        assert!(snap.stage_times.contains(Stage::Compress));
        assert!(snap.stage_times.contains(Stage::Split));
        assert!(snap.output.is_none());
    }

    #[test]
    fn decoder_snapshot_matches_encoder_counts() {
        let data = vec![b'q'; 150_000];
        let wire = encode_all(&data).unwrap();

        let mut dec = FrameDecoder::new(true);
        dec.feed(&wire).unwrap();
        dec.finish().unwrap();

        let snap = dec.telemetry();
        assert_eq!(snap.counters.frames_identifier, 1);
        assert_eq!(snap.counters.frames_data(), 3);
        assert_eq!(snap.counters.bytes_raw, 150_000);
        assert_eq!(snap.counters.bytes_wire, wire.len() as u64);
        assert!(snap.stage_times.contains(Stage::Parse));
        assert!(snap.stage_times.contains(Stage::Decompress));
    }

    #[test]
    fn empty_snapshot_has_zero_ratio() {
        let snap = TelemetrySnapshot::from(&TelemetryCounters::default(), &TelemetryTimer::new());
        assert_eq!(snap.compression_ratio, 0.0);
        assert_eq!(snap.total_stage_time(), Duration::ZERO);
    }

    #[test]
    fn snapshot_json_skips_output() {
        let mut snap = FrameEncoder::new().telemetry();
        snap.attach_output(vec![1, 2, 3]);

        let json = snap.to_json().unwrap();
        assert!(json.contains("\"counters\""));
        assert!(!json.contains("\"output\""));

        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.counters, snap.counters);
        assert!(back.output.is_none());
    }
}
