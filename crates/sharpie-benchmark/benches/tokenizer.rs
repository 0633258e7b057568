use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};

static SOURCE: &str = r#"
public static async Task<int> Run(int[] xs, string s = @"verbatim ""text""", char c = '\n')
{
    var total = 0x7F_FF + 1_000L + 1.5e3f + 2.0m; // comment
    /* block */ total <<= 2; total >>= 1; total ??= null; total?.x ?? y;
    return $"{total,8:x4} {s}" is string t && t.Length > 0 ? 1 : 0;
}
"#;

static IDENTIFIERS: &str =
    "It was the year when they finally immanentized the Eschaton It was the year when they \
     finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton It was the year when \
     they finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton";

static PREPROCESSOR: &str = "
#define TRACE
#if DEBUG && !TRACE
class Disabled { }
#elif TRACE
class Enabled { }
#else
class Other { }
#endif
#region r
#endregion
";

fn iterate(s: &str) {
    use sharpie_tokenizer::{SyntaxKind, Tokenizer};

    let mut tokenizer = Tokenizer::new(s);

    loop {
        let token_index = tokenizer.next_token_index();
        let next_token = tokenizer.token(token_index);

        if next_token.kind == SyntaxKind::EOF {
            break;
        }

        black_box(next_token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in [
        ("identifiers", IDENTIFIERS.repeat(16)),
        ("keywords_literals_and_operators", SOURCE.repeat(16)),
        ("preprocessor", PREPROCESSOR.repeat(16)),
    ] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, source.as_str(), |b, s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
