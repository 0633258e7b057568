use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use sharpie_db::{RootDatabase, parse_file};
use sharpie_inputs::File;
use sharpie_parse::ParseOptions;

static MEDIUM: &str = r#"
using System;
using System.Collections.Generic;
using System.Linq;

namespace Inventory
{
    public sealed class Warehouse<TItem> where TItem : class, IItem
    {
        private readonly Dictionary<string, List<TItem>> _shelves = new Dictionary<string, List<TItem>>();

        public int Count => _shelves.Values.Sum(shelf => shelf.Count);

        public void Add(string shelf, TItem item)
        {
            if (!_shelves.TryGetValue(shelf, out var items))
            {
                items = new List<TItem>();
                _shelves[shelf] = items;
            }
            items.Add(item ?? throw new ArgumentNullException(nameof(item)));
        }

        public IEnumerable<TItem> Heavier(double limit) =>
            from shelf in _shelves.Values
            from item in shelf
            where item.Weight > limit && !(item is null)
            orderby item.Weight descending
            select item;

        public async Task<int> CountAsync(CancellationToken token = default)
        {
            await Task.Delay(1, token);
            int total = 0;
            foreach (var (key, shelf) in _shelves)
            {
                for (int i = 0; i < shelf.Count; i++)
                {
                    total += shelf[i] switch { null => 0, _ => 1 };
                }
            }
            return total >> 1 << 1;
        }
    }
}
"#;

fn medium_with_errors() -> String {
    MEDIUM.replace(';', "").replace(')', "")
}

fn benchmark_parser(c: &mut Criterion) {
    let sources = [
        ("simple", "class C { void M() { return; } }".to_owned()),
        ("medium", MEDIUM.to_owned()),
        ("large", MEDIUM.repeat(32)),
        ("errors", medium_with_errors()),
    ];

    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in &sources {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_compilation_unit", name), text, |b, text| {
            b.iter(|| black_box(sharpie_parse::parse_compilation_unit(text)));
        });
    }

    group.finish();
}

fn benchmark_incremental(c: &mut Criterion) {
    use salsa::Setter as _;

    let mut db = RootDatabase::default();
    let file = File::new(&db, "medium.cs".into(), MEDIUM.to_owned(), ParseOptions::default());
    let edited = MEDIUM.replace("limit", "threshold");

    c.bench_function("reparse_after_edit", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let text = if flip { edited.clone() } else { MEDIUM.to_owned() };
            file.set_text(&mut db).to(text);
            black_box(parse_file(&db, file).diagnostics().len());
        });
    });
}

criterion_group!(benches, benchmark_parser, benchmark_incremental);
criterion_main!(benches);
