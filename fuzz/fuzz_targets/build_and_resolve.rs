#![no_main]
use libfuzzer_sys::fuzz_target;
use routeit::{Outcome, Route, Router};

fuzz_target!(|data: (Vec<(String, u8)>, String)| {
    let routes = data
        .0
        .into_iter()
        .map(|(pattern, behavior)| {
            Route::new(pattern).action(move |ctx, _| match behavior % 4 {
                0 => Ok(Outcome::Produced(ctx.route().id().index())),
                1 => Ok(Outcome::Skip),
                2 => Ok(ctx.next()?.into()),
                _ => Ok(Outcome::Continue),
            })
        })
        .collect::<Vec<_>>();

    let router: Router<usize> = match Router::new(routes) {
        Ok(router) => router,
        Err(_) => return,
    };

    let _ = router.resolve(&data.1);
});
