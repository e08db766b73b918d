//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 → 读取 → 变换 → 分发 的端到端测试
//! - 计数、连接、排序、top-N 的性质测试

#[cfg(test)]
mod contract_tests {
    use contracts::{DataType, Dataset, Field, Schema, StepReport, Value};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_step_report_json_snapshot() {
        let schema = Schema::try_new(vec![
            Field::new("customer_state", DataType::String),
            Field::new("count", DataType::Integer),
        ])
        .unwrap();
        let ds = Dataset::try_new(
            schema,
            vec![
                vec![Value::from("SP"), Value::Integer(2)],
                vec![Value::Null, Value::Integer(1)],
            ],
        )
        .unwrap();
        let report = StepReport::table("joined_top_groups", "Top states", ds);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "step": "joined_top_groups",
                "title": "Top states",
                "outcome": {
                    "kind": "table",
                    "dataset": {
                        "schema": [
                            { "name": "customer_state", "data_type": "string" },
                            { "name": "count", "data_type": "integer" }
                        ],
                        "rows": [
                            { "customer_state": "SP", "count": 2 },
                            { "customer_state": null, "count": 1 }
                        ]
                    }
                }
            })
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::cell::RefCell;
    use std::fs;
    use std::io::{self, Write};
    use std::path::Path;
    use std::rc::Rc;

    use config_loader::ConfigLoader;
    use contracts::{ContractError, GroupOptions, JoinKind, StepReport, Value};
    use dispatcher::{create_dispatcher, JsonSink, ReportDispatcher};
    use ingestion::{load, CsvLoader, CsvOptions};
    use tempfile::TempDir;
    use transform::{
        count, describe_schema, group_and_count, group_and_count_with, inner_join, top_n,
        unmatched_rows,
    };

    /// Writer whose bytes stay readable after the sink is boxed
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn write_csv(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    /// Scenario: one customer (1); orders 10 → 1 and 11 → 2
    #[test]
    fn test_unmatched_order_dropped_by_inner_join() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "customers.csv", "customer_id,customer_state\n1,SP\n");
        write_csv(
            dir.path(),
            "orders.csv",
            "order_id,customer_id,order_status\n10,1,shipped\n11,2,shipped\n",
        );

        let customers = load(&dir.path().join("customers.csv"), true, true).unwrap();
        let orders = load(&dir.path().join("orders.csv"), true, true).unwrap();

        let joined = inner_join(&orders, &customers, "customer_id").unwrap();
        assert_eq!(count(&joined), 1);
        assert_eq!(joined.value(0, "order_id"), Some(&Value::Integer(10)));
        assert_eq!(joined.value(0, "customer_state"), Some(&Value::from("SP")));
    }

    #[test]
    fn test_duplicate_customer_ids_grow_the_join() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "customers.csv",
            "customer_id,customer_state\n1,SP\n1,RJ\n",
        );
        write_csv(
            dir.path(),
            "orders.csv",
            "order_id,customer_id\n10,1\n11,2\n",
        );

        let customers = load(&dir.path().join("customers.csv"), true, true).unwrap();
        let orders = load(&dir.path().join("orders.csv"), true, true).unwrap();

        let joined = inner_join(&orders, &customers, "customer_id").unwrap();
        assert_eq!(count(&joined), 2);
        assert!(count(&joined) >= count(&orders));
        assert_eq!(unmatched_rows(&orders, &customers, "customer_id").unwrap(), 1);
    }

    /// Scenario: statuses [shipped, shipped, delivered]
    #[test]
    fn test_status_counts_ordered() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "orders.csv",
            "order_id,customer_id,order_status\n1,1,shipped\n2,1,shipped\n3,2,delivered\n",
        );
        let orders = load(&dir.path().join("orders.csv"), true, true).unwrap();

        let result = group_and_count(&orders, &["order_status"], true).unwrap();
        let groups: Vec<(String, i64)> = result
            .groups()
            .map(|(key, n)| (key[0].to_string(), n))
            .collect();
        assert_eq!(
            groups,
            vec![("shipped".to_string(), 2), ("delivered".to_string(), 1)]
        );
    }

    #[test]
    fn test_without_inference_every_column_is_string() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "orders.csv", "order_id,amount\n1,2.5\n");
        let orders = load(&dir.path().join("orders.csv"), true, false).unwrap();
        assert!(describe_schema(&orders)
            .iter()
            .all(|(_, t)| *t == contracts::DataType::String));
        assert_eq!(orders.value(0, "amount"), Some(&Value::from("2.5")));
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let result = load(&dir.path().join("absent.csv"), true, true);
        assert!(matches!(result, Err(ContractError::SourceNotFound { .. })));
    }

    /// Config file → load → transform → dispatch to a JSON sink
    #[test]
    fn test_config_to_json_reports() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "customers.csv",
            "customer_id;customer_state\n1;SP\n2;RJ\n3;SP\n",
        );
        write_csv(
            dir.path(),
            "orders.csv",
            "order_id,customer_id,order_status\n10,1,shipped\n11,2,NA\n12,3,delivered\n13,3,shipped\n",
        );
        let config_path = dir.path().join("walkthrough.toml");
        fs::write(
            &config_path,
            r#"
[sources.customers]
path = "customers.csv"
delimiter = ";"

[sources.orders]
path = "orders.csv"
null_values = ["NA"]

[join]
on = "customer_id"
how = "inner"

[analysis]
top_n = 1
null_keys = "drop"

[[sinks]]
name = "log"
sink_type = "log"
"#,
        )
        .unwrap();

        let bp = ConfigLoader::load_from_path(&config_path).unwrap();
        let customers = CsvLoader::new(CsvOptions::try_from(&bp.sources.customers).unwrap())
            .load(bp.sources.customers.path())
            .unwrap();
        let orders = CsvLoader::new(CsvOptions::try_from(&bp.sources.orders).unwrap())
            .load(bp.sources.orders.path())
            .unwrap();

        let options = GroupOptions::default().with_null_keys(bp.analysis.null_keys);
        let by_status =
            group_and_count_with(&orders, &bp.analysis.order_group_by, options).unwrap();
        // NA is null and dropped
        assert_eq!(by_status.total_count(), 3);

        let joined = transform::join(&orders, &customers, &bp.join.on, bp.join.how).unwrap();
        let by_state =
            group_and_count_with(&joined, &bp.analysis.joined_group_by, options).unwrap();
        let top = top_n(&by_state, bp.analysis.top_n).unwrap();

        let buffer = SharedBuffer::default();
        let mut dispatcher = create_dispatcher(&bp.sinks).unwrap();
        dispatcher.add_sink(Box::new(JsonSink::with_writer("json", buffer.clone())));
        dispatcher
            .dispatch(&StepReport::count("joined_count", "Joined", count(&joined)))
            .unwrap();
        dispatcher
            .dispatch(&StepReport::table("joined_top_groups", "Top", top))
            .unwrap();
        dispatcher.finish().unwrap();

        let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["outcome"]["rows"], 4);
        let rows = &lines[1]["outcome"]["dataset"]["rows"];
        assert_eq!(rows.as_array().map(Vec::len), Some(1));
        assert_eq!(rows[0]["customer_state"], "SP");
        assert_eq!(rows[0]["count"], 3);

        for (_, snapshot) in dispatcher.metrics() {
            assert_eq!(snapshot.write_count, 2);
        }
    }

    #[test]
    fn test_left_join_through_dispatcher_defaults() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "customers.csv", "customer_id,customer_state\n1,SP\n");
        write_csv(
            dir.path(),
            "orders.csv",
            "order_id,customer_id,order_status\n10,1,shipped\n11,2,shipped\n",
        );
        let customers = load(&dir.path().join("customers.csv"), true, true).unwrap();
        let orders = load(&dir.path().join("orders.csv"), true, true).unwrap();

        let joined = transform::join(&orders, &customers, "customer_id", JoinKind::Left).unwrap();
        assert_eq!(count(&joined), count(&orders));
        assert_eq!(joined.value(1, "customer_state"), Some(&Value::Null));

        let mut dispatcher = ReportDispatcher::new();
        dispatcher
            .dispatch(&StepReport::count("joined_count", "Joined", count(&joined)))
            .unwrap();
        assert_eq!(dispatcher.dispatched(), 1);
    }
}

#[cfg(test)]
mod property_tests {
    use contracts::{DataType, Dataset, Field, Schema, Value};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use transform::{count, group_and_count, inner_join, top_n, GroupOptions, JoinKind, Plan};

    const STATES: [&str; 5] = ["SP", "RJ", "MG", "RS", "PR"];
    const STATUSES: [&str; 4] = ["shipped", "delivered", "canceled", "invoiced"];

    fn customers(rng: &mut StdRng, n: i64) -> Dataset {
        let schema = Schema::try_new(vec![
            Field::new("customer_id", DataType::Integer),
            Field::new("customer_state", DataType::String),
        ])
        .unwrap();
        let rows = (0..n)
            .map(|id| {
                let state = STATES[rng.random_range(0..STATES.len())];
                vec![Value::Integer(id), Value::from(state)]
            })
            .collect();
        Dataset::try_new(schema, rows).unwrap()
    }

    fn orders(rng: &mut StdRng, n: i64, max_customer: i64) -> Dataset {
        let schema = Schema::try_new(vec![
            Field::new("order_id", DataType::Integer),
            Field::new("customer_id", DataType::Integer),
            Field::new("order_status", DataType::String),
        ])
        .unwrap();
        let rows = (0..n)
            .map(|id| {
                // ~1 in 10 orders has no customer id
                let customer = if rng.random_range(0..10) == 0 {
                    Value::Null
                } else {
                    Value::Integer(rng.random_range(0..max_customer))
                };
                let status = STATUSES[rng.random_range(0..STATUSES.len())];
                vec![Value::Integer(id), customer, Value::from(status)]
            })
            .collect();
        Dataset::try_new(schema, rows).unwrap()
    }

    #[test]
    fn test_count_equals_sum_of_group_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let ds = orders(&mut rng, 200, 50);
            for column in ["order_id", "customer_id", "order_status"] {
                let result = group_and_count(&ds, &[column], true).unwrap();
                assert_eq!(result.total_count(), count(&ds) as i64, "column {column}");
            }
        }
    }

    #[test]
    fn test_inner_join_never_exceeds_orders() {
        let mut rng = StdRng::seed_from_u64(11);
        for round in 0..20 {
            // Customer ids 0..30; orders reference 0..40 so some miss
            let c = customers(&mut rng, 30);
            let o = orders(&mut rng, 150, if round % 2 == 0 { 30 } else { 40 });
            let joined = inner_join(&o, &c, "customer_id").unwrap();

            let all_match = o.rows().iter().all(|row| match row[1] {
                Value::Integer(id) => id < 30,
                _ => false,
            });
            assert!(count(&joined) <= count(&o));
            assert_eq!(count(&joined) == count(&o), all_match);
        }
    }

    #[test]
    fn test_group_counts_descending_then_key_ascending() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let ds = orders(&mut rng, 300, 20);
            let result = group_and_count(&ds, &["order_status"], true).unwrap();
            let groups: Vec<(Vec<Value>, i64)> =
                result.groups().map(|(k, n)| (k.to_vec(), n)).collect();
            for pair in groups.windows(2) {
                assert!(pair[0].1 >= pair[1].1);
                if pair[0].1 == pair[1].1 {
                    assert!(pair[0].0 < pair[1].0);
                }
            }
        }
    }

    #[test]
    fn test_top_n_is_prefix_of_ordered_result() {
        let mut rng = StdRng::seed_from_u64(5);
        let ds = orders(&mut rng, 100, 25);
        let result = group_and_count(&ds, &["customer_id"], true).unwrap();
        for n in [0, 1, 3, result.num_groups() as i64, 1_000] {
            let top = top_n(&result, n).unwrap();
            let expected = (n as usize).min(result.num_groups());
            assert_eq!(top.num_rows(), expected);
            assert_eq!(top.rows(), &result.dataset().rows()[..expected]);
        }
    }

    #[test]
    fn test_plan_matches_eager_pipeline() {
        let mut rng = StdRng::seed_from_u64(13);
        let c = customers(&mut rng, 40);
        let o = orders(&mut rng, 250, 45);

        let plan = Plan::scan("orders", o.clone())
            .join(Plan::scan("customers", c.clone()), "customer_id", JoinKind::Inner)
            .group_and_count(&["customer_state"], GroupOptions::default())
            .top_n(3);
        let lazy = plan.materialize().unwrap();

        let joined = inner_join(&o, &c, "customer_id").unwrap();
        let eager = top_n(
            &group_and_count(&joined, &["customer_state"], true).unwrap(),
            3,
        )
        .unwrap();

        assert_eq!(lazy.schema(), eager.schema());
        assert_eq!(lazy.rows(), eager.rows());
    }
}
