//! # Integration Tests
//!
//! End-to-end checks across the control pipeline:
//! - tracker intake into the gesture stage
//! - gesture signal driving the speed ticker and vehicle rig
//! - HUD frames reaching a file sink
//! - configuration loaded from TOML tuning every stage

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_default_blueprint_validates() {
        let bp = config_loader::ConfigLoader::load_from_str("", config_loader::ConfigFormat::Toml)
            .unwrap();
        assert_eq!(bp.gesture.steering_limit_deg, 30.0);
        assert!(bp.hud.is_empty());
    }

    #[test]
    fn test_sample_config_loads() {
        let content = include_str!("../../../racer.toml");
        let bp =
            config_loader::ConfigLoader::load_from_str(content, config_loader::ConfigFormat::Toml)
                .unwrap();
        assert_eq!(bp.hud.len(), 2);
        assert_eq!(bp.hud[1].params["path"], "hud.jsonl");
        assert_eq!(bp.session.fps, 60.0);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use contracts::{
        ControlSignal, Direction, DriveInput, Gear, GestureConfig, HandSet, Handedness,
        HudFrame, HudSinkConfig, HudSinkType, RacerBlueprint,
    };
    use drivetrain::{SpeedIntegrator, SpeedTicker};
    use gesture::GestureStage;
    use hud::create_dispatcher;
    use ingestion::{synth, BackpressureConfig, MockHandSource, MockScript, TrackingPipeline};
    use observability::SessionMetricsAggregator;
    use tokio::sync::mpsc;
    use vehicle::DriveRig;

    const DT: f32 = 1.0 / 60.0;

    /// MockHandSource -> TrackingPipeline -> GestureStage
    #[tokio::test]
    async fn test_e2e_mock_tracker_to_signal() {
        let mut tracking = TrackingPipeline::new(BackpressureConfig::default());
        tracking
            .register_source(Box::new(MockHandSource::new(
                "webcam",
                MockScript::Straight,
                100.0,
            )))
            .unwrap();

        let stage = GestureStage::new(GestureConfig::default());
        let mut control_rx = stage.subscribe();
        let handle = stage.spawn(tracking.take_receiver().unwrap());

        assert_eq!(tracking.start_all(), 1);

        let signal = tokio::time::timeout(
            Duration::from_secs(5),
            control_rx.wait_for(|s| s.gear == Gear::Accelerate),
        )
        .await
        .expect("accelerate signal within timeout")
        .map(|s| *s)
        .unwrap();
        assert_eq!(signal.direction, Direction::Straight);

        tracking.stop_all();
        let summary = handle.stop().await;
        assert!(summary.hand_sets >= 1);
        assert!(tracking.metrics().snapshot().hand_sets_received >= 1);
    }

    /// A tracker that never starts leaves the signal at idle
    #[tokio::test]
    async fn test_e2e_tracker_unavailable_keeps_idle() {
        let mut tracking = TrackingPipeline::new(BackpressureConfig::default());
        tracking
            .register_source(Box::new(MockHandSource::unavailable("webcam")))
            .unwrap();

        let stage = GestureStage::new(GestureConfig::default());
        let control_rx = stage.subscribe();
        let handle = stage.spawn(tracking.take_receiver().unwrap());

        assert_eq!(tracking.start_all(), 0);
        assert!(!tracking.is_source_listening("webcam"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*control_rx.borrow(), ControlSignal::IDLE);

        let summary = handle.stop().await;
        assert_eq!(summary.hand_sets, 0);
        assert_eq!(tracking.metrics().snapshot().tracker_errors, 1);
    }

    /// Hand sets -> GestureStage -> SpeedTicker -> DriveRig
    #[tokio::test(start_paused = true)]
    async fn test_e2e_accelerate_and_steer_left() {
        let bp = RacerBlueprint::default();
        let (hands_tx, hands_rx) = async_channel::bounded(8);

        let stage = GestureStage::new(bp.gesture.clone());
        let mut control_rx = stage.subscribe();
        let gesture = stage.spawn(hands_rx);

        hands_tx
            .send(synth::hand_set(Gear::Accelerate, 20.0))
            .await
            .unwrap();
        control_rx.changed().await.unwrap();
        let signal = *control_rx.borrow_and_update();
        assert_eq!(signal.gear, Gear::Accelerate);
        assert_eq!(signal.direction, Direction::Left);
        assert!((signal.steering_angle_deg - 20.0).abs() < 0.1);

        let ticker = SpeedTicker::spawn(
            SpeedIntegrator::new(bp.drivetrain.clone()),
            control_rx.clone(),
        );
        tokio::time::sleep(Duration::from_millis(525)).await;
        assert_eq!(ticker.speed(), 20.0);

        let mut rig = DriveRig::mounted(&bp);
        let start = rig.position();
        for _ in 0..120 {
            let input = DriveInput {
                speed: ticker.speed(),
                steering_angle_deg: control_rx.borrow().steering_angle_deg,
            };
            rig.step(input, DT).unwrap();
        }
        assert!(rig.body().unwrap().yaw_deg() > 0.0);
        assert!(rig.position().z < start.z, "car heads toward -Z");

        // brake wins when both index fingers are up
        let (left_pinch, right_pinch) = synth::pinch_points(0.0);
        let both = HandSet::both(
            0.1,
            synth::hand(Handedness::Left, left_pinch, true),
            synth::hand(Handedness::Right, right_pinch, true),
        );
        hands_tx.send(both).await.unwrap();
        control_rx.changed().await.unwrap();
        assert_eq!(control_rx.borrow().gear, Gear::Brake);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let last = ticker.stop().await;
        assert_eq!(last.speed, 0.0);

        let summary = gesture.stop().await;
        assert_eq!(summary.hand_sets, 2);
        assert_eq!(summary.signal_changes, 2);
    }

    /// Dropouts and lone hands hold the last signal
    #[tokio::test]
    async fn test_e2e_signal_loss_holds_previous() {
        let mut stage = GestureStage::new(GestureConfig::default());
        let control_rx = stage.subscribe();

        let driving = MockScript::SignalLoss.hand_set_at(0.5);
        assert!(stage.process(&driving).is_some());
        let held = *control_rx.borrow();
        assert_eq!(held.gear, Gear::Accelerate);

        assert!(stage.process(&MockScript::SignalLoss.hand_set_at(2.5)).is_none());
        assert!(stage.process(&MockScript::SignalLoss.hand_set_at(4.5)).is_none());
        assert_eq!(*control_rx.borrow(), held);
        assert_eq!(stage.summary().held_frames, 2);
    }

    /// Frame loop output -> HUD dispatcher -> file sink
    #[tokio::test]
    async fn test_e2e_hud_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hud.jsonl");

        let (hud_tx, hud_rx) = mpsc::channel::<HudFrame>(16);
        let sinks = vec![HudSinkConfig {
            name: "recorder".to_string(),
            sink_type: HudSinkType::File,
            queue_capacity: 16,
            params: HashMap::from([("path".to_string(), path.display().to_string())]),
        }];
        let dispatcher = create_dispatcher(sinks, hud_rx).await.unwrap();
        let task = dispatcher.spawn();

        let bp = RacerBlueprint::default();
        let mut rig = DriveRig::mounted(&bp);
        let mut aggregator = SessionMetricsAggregator::new();
        let signal = ControlSignal {
            gear: Gear::Accelerate,
            steering_angle_deg: -15.0,
            direction: Direction::Right,
        };
        for frame_id in 0..3u64 {
            let speed = 40.0 + frame_id as f32;
            let input = DriveInput {
                speed,
                steering_angle_deg: signal.steering_angle_deg,
            };
            rig.step(input, DT).unwrap();
            aggregator.record_frame(speed, &signal, DT);
            let position = rig.position();
            hud_tx
                .send(HudFrame::new(
                    frame_id,
                    frame_id as f64 * DT as f64,
                    speed,
                    &signal,
                    [position.x, position.y, position.z],
                ))
                .await
                .unwrap();
        }
        drop(hud_tx);

        let metrics = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].1.write_count, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2]["frame_id"], 2);
        assert_eq!(lines[2]["direction"], "right");
        assert!(lines[0]["recorded_at"].is_string());

        let summary = aggregator.summary();
        assert_eq!(summary.total_frames, 3);
    }

    /// Values from a TOML document reach every stage
    #[tokio::test(start_paused = true)]
    async fn test_e2e_config_tunes_pipeline() {
        let toml = r#"
            [gesture]
            steering_limit_deg = 20.0
            direction_threshold_deg = 5.0

            [drivetrain]
            tick_ms = 100
            accel_rate = 10.0
            max_speed = 25.0
        "#;
        let bp =
            config_loader::ConfigLoader::load_from_str(toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        let mut stage = GestureStage::new(bp.gesture.clone());
        let control_rx = stage.subscribe();
        stage.process(&synth::hand_set(Gear::Accelerate, -28.0));
        let signal = *control_rx.borrow();
        assert_eq!(signal.steering_angle_deg, -20.0);
        assert_eq!(signal.direction, Direction::Right);

        let ticker = SpeedTicker::spawn(SpeedIntegrator::new(bp.drivetrain.clone()), control_rx);
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(ticker.speed(), 20.0);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(ticker.speed(), 25.0);
        ticker.stop().await;
    }
}
