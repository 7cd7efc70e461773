use markmap::prelude::*;

/// End-to-end behaviour of the annotation engine as a map viewer drives it:
/// measured frame, clicks through the overlay, save through the store,
/// combined read-only view through the clusterer.
#[cfg(test)]
mod annotation_engine_tests {
    use super::*;

    fn frame() -> RenderedImageFrame {
        RenderedImageFrame::measured(640.0, 480.0).expect("valid frame")
    }

    fn new_map(marks: MarkSet) -> NewMarkedMap {
        NewMarkedMap {
            map_id: "TNL-042".to_string(),
            map_name: "Frostspring Volcano".to_string(),
            image_url: "https://cdn.example/TNL-042.png".to_string(),
            marks,
        }
    }

    #[test]
    fn test_clamping_over_many_offsets() {
        let frames = [
            RenderedImageFrame::new(1.0, 1.0),
            RenderedImageFrame::new(600.0, 420.0),
            RenderedImageFrame::new(1920.0, 1080.0),
        ];
        let offsets = [-1e6, -13.0, -0.001, 0.0, 0.5, 299.9, 600.0, 1080.0, 5000.0, 1e9];

        for frame in &frames {
            for &px in &offsets {
                for &py in &offsets {
                    let mark = CoordinateMapper::pixel_to_percent(px, py, frame);
                    assert!((0.0..=100.0).contains(&mark.x), "x out of range for px={px}");
                    assert!((0.0..=100.0).contains(&mark.y), "y out of range for py={py}");
                }
            }
        }
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let frame = frame();
        for step in 0..=20 {
            let x = step as f64 * 5.0;
            let y = 100.0 - x * 0.37;
            let pixel = CoordinateMapper::percent_to_pixel(&MarkPosition::new(x, y), &frame);
            let back = CoordinateMapper::pixel_to_percent(pixel.x, pixel.y, &frame);
            assert!((back.x - x).abs() < 1e-6);
            assert!((back.y - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_add_remove_symmetry() {
        let controller = MarkOverlayController::new(ClickMode::RemoveOnClick);
        let click = Point::new(211.0, 97.0);

        let marks = controller
            .handle_click(&[], click, &frame())
            .into_marks()
            .expect("background click adds");
        assert_eq!(marks.len(), 1);
        let expected = CoordinateMapper::pixel_to_percent(click.x, click.y, &frame());
        assert_eq!(marks[0], expected);

        let marks = controller
            .handle_click(&marks, click, &frame())
            .into_marks()
            .expect("click on mark removes");
        assert!(marks.is_empty());
    }

    #[test]
    fn test_read_only_suppression() {
        let controller = MarkOverlayController::read_only(ClickMode::RemoveOnClick);
        let marks = vec![MarkPosition::new(25.0, 25.0), MarkPosition::new(75.0, 75.0)];
        let snapshot = marks.clone();

        for click in [Point::new(160.0, 120.0), Point::new(5.0, 470.0), Point::new(480.0, 360.0)] {
            assert_eq!(controller.handle_click(&marks, click, &frame()), ClickOutcome::Ignored);
        }
        assert_eq!(marks, snapshot);
    }

    #[test]
    fn test_hit_radius_is_pixel_based() {
        let controller = MarkOverlayController::default();
        let marks = vec![MarkPosition::new(50.0, 50.0)];

        // 2% of width is 12px on a 600px image but 40px on a 2000px image
        let small = RenderedImageFrame::new(600.0, 600.0);
        let large = RenderedImageFrame::new(2000.0, 2000.0);
        assert_eq!(controller.hit_test(&marks, Point::new(312.0, 300.0), &small), Some(0));
        assert_eq!(controller.hit_test(&marks, Point::new(1040.0, 1000.0), &large), None);
    }

    #[test]
    fn test_clustering_properties() {
        let clusterer = MarkClusterer::default();

        let merged = clusterer.merge(&[MarkPosition::new(10.0, 10.0), MarkPosition::new(11.0, 11.0)]);
        assert_eq!(merged, vec![MarkPosition::new(10.0, 10.0)]);

        let apart = clusterer.merge(&[MarkPosition::new(10.0, 10.0), MarkPosition::new(20.0, 20.0)]);
        assert_eq!(apart.len(), 2);

        let labeled = clusterer.merge(&[
            MarkPosition::new(10.0, 10.0).with_name("A"),
            MarkPosition::new(10.5, 10.0).with_name("B"),
        ]);
        assert_eq!(labeled, vec![MarkPosition::new(10.0, 10.0).with_name("A")]);
    }

    #[test]
    fn test_rename_normalization() {
        let marks = vec![MarkPosition::new(1.0, 1.0).with_name("Chest")];
        let renamed = rename_mark(&marks, 0, "   ");
        assert_eq!(renamed[0].name, None);

        let json = serde_json::to_string(&renamed[0]).unwrap();
        assert!(!json.contains("name"));
    }

    #[tokio::test]
    async fn test_mark_save_and_combined_view() {
        let store = InMemoryStore::new();

        // first user marks two spots
        let mut session = MarkingSession::default();
        session.select_map(MapSelection::new(
            "TNL-042",
            "Frostspring Volcano",
            Some("https://cdn.example/TNL-042.png".to_string()),
        ));
        session.measure(640.0, 480.0);
        session.click(Point::new(64.0, 48.0));
        session.click(Point::new(320.0, 240.0));
        let first = store
            .create(session.to_new_record().expect("map selected"))
            .await
            .unwrap();

        // second user marks nearly the same spot plus a new one
        let second = store
            .create(new_map(vec![
                MarkPosition::new(10.5, 10.5).with_name("dup"),
                MarkPosition::new(90.0, 90.0),
            ]))
            .await
            .unwrap();

        // an unrelated map with an id no catalog knows about
        store
            .create(NewMarkedMap {
                map_id: "ORPHAN".to_string(),
                map_name: "Gone".to_string(),
                image_url: String::new(),
                marks: vec![MarkPosition::new(10.0, 10.0)],
            })
            .await
            .unwrap();

        let records = store.for_map("TNL-042").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, second.id);

        let combined = MarkClusterer::default().combine_records(&records);
        assert_eq!(
            combined,
            vec![
                MarkPosition::new(10.5, 10.5).with_name("dup"),
                MarkPosition::new(90.0, 90.0),
                MarkPosition::new(50.0, 50.0),
            ]
        );

        // editing a saved record and pushing the draft back verbatim
        session.load_record(&first);
        session.rename(1, "Center");
        let updated = store.update(&first.id, session.to_update()).await.unwrap();
        assert_eq!(updated.marks[1].name.as_deref(), Some("Center"));
        assert_eq!(updated.marks.len(), 2);

        let summaries = group_by_map(&store.list(&ListQuery::all()).await.unwrap());
        let volcano = summaries.iter().find(|s| s.map_id == "TNL-042").unwrap();
        assert_eq!(volcano.saved_count, 2);
        assert_eq!(volcano.total_marks, 4);
        assert!(summaries.iter().any(|s| s.map_id == "ORPHAN"));
    }
}
