use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use memdb::{Database, Row, Value};
use std::hint::black_box;

fn setup_populated_db(n: usize) -> Database {
    let mut db = Database::new();

    db.execute("CREATE TABLE users (id int, name str, age int, team str)")
        .unwrap();

    let table = db.get_table_mut("users").unwrap();

    for i in 0..n {
        let row = Row::new(vec![
            Value::Int(i as i64),
            Value::from(format!("user{i}")),
            Value::Int((i % 100) as i64),
            Value::from(if i % 2 == 0 { "red" } else { "blue" }),
        ]);
        table.insert_row(row).unwrap();
    }
    db
}

fn bench_insert_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert_SQL_Pipeline");
    group.bench_function("insert_single_row_sql", |b| {
        let mut db = Database::new();
        db.execute("CREATE TABLE tests (id int)").unwrap();
        b.iter(|| {
            db.execute(black_box("INSERT INTO tests VALUES (42)"))
                .unwrap();
        });
    });
    group.bench_function("insert_partial_columns_sql", |b| {
        let mut db = Database::new();
        db.execute("CREATE TABLE tests (id int, name str, age int)")
            .unwrap();
        b.iter(|| {
            db.execute(black_box("INSERT INTO tests (age, name) VALUES (7, 'x'), (8, 'y')"))
                .unwrap();
        });
    });
    group.finish();
}

fn bench_select_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Where_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let db = setup_populated_db(n);
            b.iter(|| {
                let res = db.query("SELECT * FROM users WHERE age = 42").unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

fn bench_select_compound_where(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Compound_Where");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let db = setup_populated_db(n);
            b.iter(|| {
                let res = db
                    .query("SELECT name, id FROM users WHERE (age < 10 OR age > 90) AND team = 'red'")
                    .unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

fn bench_update_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Update_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_with_setup(
                || setup_populated_db(n),
                |mut db| {
                    db.execute("UPDATE users SET age = 99 WHERE team = 'red'")
                        .unwrap();
                    black_box(db);
                },
            );
        });
    }
    group.finish();
}

fn bench_delete_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Delete_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_with_setup(
                || setup_populated_db(n),
                |mut db| {
                    db.execute("DELETE FROM users WHERE age > 90").unwrap();
                    black_box(db);
                },
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_sql,
    bench_select_scaling,
    bench_select_compound_where,
    bench_update_performance,
    bench_delete_performance
);
criterion_main!(benches);
