
/// A category index page in the shape the directory renders: a grid of cards,
/// each with an image link and a title link to the same product.
pub(crate) const INDEX_PAGE: &str = r#"
<html><body>
  <div class="header"><a href="/proddetail/banner-offer.html"><i class="icon-hot"></i></a></div>
  <ul class="grid">
    <li class="card">
      <div class="img"><a href="https://www.indiamart.com/proddetail/lathe-machine-101.html"><img alt="Lathe Machine"></a></div>
      <div class="body">
        <a class="title" href="https://www.indiamart.com/proddetail/lathe-machine-101.html">Heavy Duty Lathe Machine</a>
        <p class="price">₹ 60,000 / Piece</p>
        <a href="https://www.indiamart.com/company/acme-tools/">Acme Tools Pvt Ltd</a>
        <span>Contact Supplier</span>
        <span>Rajkot, Gujarat</span>
      </div>
    </li>
    <li class="card">
      <div class="body">
        <a class="title" href="//www.indiamart.com/proddetail/cnc-router-202.html">CNC Router</a>
        <p>Price on request</p>
      </div>
    </li>
    <li class="card">
      <div class="body">
        <a class="title" href="/proddetail/drill-press-303.html#specs">Bench Drill Press</a>
        <p>Rs. 12,500</p>
        <a href="https://www.indiamart.com/bharat-machines/">Bharat Machines</a>
      </div>
    </li>
  </ul>
  <div class="pagination">
    <a href="industrial-machinery.html?page=1">1</a>
    <a href="industrial-machinery.html?page=2">Next »</a>
  </div>
</body></html>
"#;

pub(crate) const PAGE_URL: &str = "https://dir.indiamart.com/impcat/industrial-machinery.html";
