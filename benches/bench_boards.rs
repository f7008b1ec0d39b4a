use criterion::{criterion_group, criterion_main, Criterion};

use inspiration_board::{
    board::{assemble_boards, BoardRow},
    card::Card,
    response::ApiResponse,
};

fn make_rows(n: i64) -> Vec<BoardRow> {
    (1..=n)
        .map(|board_id| BoardRow {
            board_id,
            title: format!("Board {board_id}"),
            owner: "bench".to_owned(),
            theme: "grey".to_owned(),
        })
        .collect()
}

fn make_cards(boards: i64, per_board: i64) -> Vec<Card> {
    (0..boards * per_board)
        .map(|i| Card {
            card_id: i + 1,
            board_id: i % boards + 1,
            message: format!("card number {i}"),
            likes_count: i % 7,
        })
        .collect()
}

fn bench_list_boards(c: &mut Criterion) {
    let rows = make_rows(100);
    let cards = make_cards(100, 20);

    c.bench_function("assemble_boards", |b| {
        b.iter(|| assemble_boards(rows.clone(), cards.clone()))
    });

    let boards = assemble_boards(rows.clone(), cards.clone());
    c.bench_function("render_boards", |b| {
        b.iter(|| ApiResponse::boards(&boards).map(|r| r.body.to_string()))
    });
}

criterion_group!(benches, bench_list_boards);
criterion_main!(benches);
