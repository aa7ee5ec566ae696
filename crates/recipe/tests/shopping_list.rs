use foodgram_recipe::shopping_list;

mod helpers;

#[tokio::test]
async fn test_sums_shared_ingredients() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("salt", "g"), ("flour", "g")]).await?;

    let soup = state
        .command
        .create(
            john,
            helpers::recipe_input("Soup", vec![(ids[0], 5)], vec![lunch]),
        )
        .await?;
    let bread = state
        .command
        .create(
            john,
            helpers::recipe_input("Bread", vec![(ids[0], 10), (ids[1], 500)], vec![lunch]),
        )
        .await?;
    let pie = state
        .command
        .create(
            john,
            helpers::recipe_input("Pie", vec![(ids[1], 300)], vec![lunch]),
        )
        .await?;

    state.command.shopping_cart.add(john, soup.id).await?;
    state.command.shopping_cart.add(john, bread.id).await?;

    let list = shopping_list::render(state.pool(), john).await?;
    assert_eq!(list, "flour: 500 g.\nsalt: 15 g.");

    state.command.shopping_cart.add(john, pie.id).await?;
    let items = shopping_list::aggregate(state.pool(), john).await?;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "flour");
    assert_eq!(items[0].amount, 800);

    Ok(())
}

#[tokio::test]
async fn test_same_name_different_units() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;
    let lunch = helpers::create_tag(&state, "lunch").await?;
    let ids = helpers::create_ingredients(&state, &[("sugar", "g"), ("sugar", "tbsp")]).await?;

    let recipe = state
        .command
        .create(
            john,
            helpers::recipe_input("Tea", vec![(ids[0], 20), (ids[1], 2)], vec![lunch]),
        )
        .await?;
    state.command.shopping_cart.add(john, recipe.id).await?;

    let list = shopping_list::render(state.pool(), john).await?;
    assert_eq!(list, "sugar: 20 g.\nsugar: 2 tbsp.");

    Ok(())
}

#[tokio::test]
async fn test_empty_cart() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;
    let john = helpers::create_user(&state, "john").await?;

    assert_eq!(shopping_list::render(state.pool(), john).await?, "");

    Ok(())
}
